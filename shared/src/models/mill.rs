//! Mill document numbering

/// Generate a document reference number for invoices and batches
pub fn generate_reference_number(mill_code: &str, prefix: &str, year: i32, sequence: i64) -> String {
    format!("{}-{}-{}-{:04}", prefix, mill_code, year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_number_format() {
        assert_eq!(
            generate_reference_number("FMM", "PUR", 2025, 7),
            "PUR-FMM-2025-0007"
        );
    }
}
