//! Milling batch yield computation

use rust_decimal::Decimal;

/// Compute batch yield: total output weight over wheat consumed, as a percent.
///
/// Returns zero for a zero-input batch rather than dividing by zero.
pub fn yield_percent(wheat_quantity: Decimal, output_quantities: &[Decimal]) -> Decimal {
    if wheat_quantity <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let total_output: Decimal = output_quantities.iter().copied().sum();
    total_output * Decimal::from(100) / wheat_quantity
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_yield_percent() {
        // 1000 kg wheat -> 720 kg flour + 250 kg bran = 97%
        let outputs = [dec("720"), dec("250")];
        assert_eq!(yield_percent(dec("1000"), &outputs), dec("97"));
    }

    #[test]
    fn test_yield_zero_input() {
        assert_eq!(yield_percent(Decimal::ZERO, &[dec("10")]), Decimal::ZERO);
    }
}
