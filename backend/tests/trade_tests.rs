//! Purchase and sale tests
//!
//! Tests for trade bookkeeping including:
//! - Payment status derivation from total and paid amounts
//! - Invoice number generation
//! - Payment capping against the outstanding amount

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{generate_reference_number, PaymentStatus};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_payment_status_unpaid() {
        assert_eq!(
            PaymentStatus::derive(dec("1000"), Decimal::ZERO),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_payment_status_partial() {
        assert_eq!(
            PaymentStatus::derive(dec("1000"), dec("400")),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn test_payment_status_paid() {
        assert_eq!(
            PaymentStatus::derive(dec("1000"), dec("1000")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_payment_status_strings() {
        assert_eq!(PaymentStatus::Unpaid.as_str(), "unpaid");
        assert_eq!(PaymentStatus::Partial.as_str(), "partial");
        assert_eq!(PaymentStatus::Paid.as_str(), "paid");
    }

    /// Invoice numbers carry the mill code, a document prefix, the year,
    /// and a zero-padded sequence
    #[test]
    fn test_invoice_number_format() {
        assert_eq!(
            generate_reference_number("FMM", "PUR", 2025, 7),
            "PUR-FMM-2025-0007"
        );
        assert_eq!(
            generate_reference_number("FMM", "SAL", 2025, 123),
            "SAL-FMM-2025-0123"
        );
        assert_eq!(
            generate_reference_number("ABC", "MB", 2026, 10000),
            "MB-ABC-2026-10000"
        );
    }

    #[test]
    fn test_total_amount_calculation() {
        let quantity = dec("50.5");
        let rate = dec("25.0");
        assert_eq!(quantity * rate, dec("1262.5"));
    }

    /// A payment may never push paid above total
    #[test]
    fn test_payment_cap() {
        let total = dec("1000");
        let paid = dec("800");
        let payment = dec("300");

        let would_exceed = paid + payment > total;
        assert!(would_exceed);
    }

    /// Distinct sequences never collide on a document number
    #[test]
    fn test_invoice_numbers_distinct() {
        let numbers: std::collections::HashSet<String> = (1..=200)
            .map(|seq| generate_reference_number("FMM", "PUR", 2025, seq))
            .collect();
        assert_eq!(numbers.len(), 200);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Payment status is a total function of (total, paid)
        #[test]
        fn prop_payment_status_exhaustive(
            total in amount_strategy(),
            paid_fraction in 0u32..=100u32
        ) {
            let paid = total * Decimal::new(paid_fraction as i64, 2);
            let status = PaymentStatus::derive(total, paid);

            if paid <= Decimal::ZERO {
                prop_assert_eq!(status, PaymentStatus::Unpaid);
            } else if paid < total {
                prop_assert_eq!(status, PaymentStatus::Partial);
            } else {
                prop_assert_eq!(status, PaymentStatus::Paid);
            }
        }

        /// Full payment is always paid, zero payment never is
        #[test]
        fn prop_payment_status_endpoints(total in amount_strategy()) {
            prop_assert_eq!(
                PaymentStatus::derive(total, total),
                PaymentStatus::Paid
            );
            prop_assert_eq!(
                PaymentStatus::derive(total, Decimal::ZERO),
                PaymentStatus::Unpaid
            );
        }

        /// Recorded payments accumulate monotonically toward the total
        #[test]
        fn prop_payments_accumulate(
            total in amount_strategy(),
            payments in prop::collection::vec(amount_strategy(), 1..10)
        ) {
            let mut paid = Decimal::ZERO;
            for payment in payments {
                // The service rejects anything past the outstanding amount
                if paid + payment > total {
                    continue;
                }
                let before = paid;
                paid += payment;
                prop_assert!(paid > before);
                prop_assert!(paid <= total);
            }
        }

        /// Invoice sequences below 10000 are zero-padded to 4 digits
        #[test]
        fn prop_invoice_number_shape(sequence in 1i64..10000i64) {
            let number = generate_reference_number("FMM", "PUR", 2025, sequence);
            let parts: Vec<&str> = number.split('-').collect();

            prop_assert_eq!(parts.len(), 4);
            prop_assert_eq!(parts[0], "PUR");
            prop_assert_eq!(parts[1], "FMM");
            prop_assert_eq!(parts[2], "2025");
            prop_assert_eq!(parts[3].len(), 4);
            prop_assert_eq!(parts[3].parse::<i64>().unwrap(), sequence);
        }
    }
}

// ============================================================================
// Integration-Style Helpers (mirror service settlement rules)
// ============================================================================

#[cfg(test)]
mod integration_helpers {
    use super::*;

    /// Mirror of the conditional payment update: the increment applies
    /// against the stored amount, not whatever balance the caller last
    /// read, and only when the result stays within the total.
    fn settle(
        total: Decimal,
        stored_paid: Decimal,
        amount: Decimal,
    ) -> Result<(Decimal, PaymentStatus), &'static str> {
        if amount <= Decimal::ZERO {
            return Err("payment must be positive");
        }
        if stored_paid + amount > total {
            return Err("payment exceeds outstanding amount");
        }
        let new_paid = stored_paid + amount;
        Ok((new_paid, PaymentStatus::derive(total, new_paid)))
    }

    /// Two overlapping payments both sized against a stale zero balance:
    /// the stored amount decides, so the second one bounces instead of
    /// pushing paid past the total
    #[test]
    fn test_overlapping_payments_capped() {
        let total = dec("1000");

        let (paid, status) = settle(total, Decimal::ZERO, dec("600")).unwrap();
        assert_eq!(paid, dec("600"));
        assert_eq!(status, PaymentStatus::Partial);

        // Second request saw paid = 0 too, but settlement runs against
        // the stored 600
        assert!(settle(total, paid, dec("600")).is_err());
        assert!(paid <= total);
    }

    #[test]
    fn test_exact_settlement_marks_paid() {
        let total = dec("1000");
        let (paid, status) = settle(total, dec("400"), dec("600")).unwrap();
        assert_eq!(paid, total);
        assert_eq!(status, PaymentStatus::Paid);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// However payments interleave, the stored amount never exceeds
        /// the total and rejected payments leave it unchanged
        #[test]
        fn prop_settlement_never_overshoots(
            total in (1i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            payments in prop::collection::vec(
                (1i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
                1..10
            )
        ) {
            let mut stored = Decimal::ZERO;
            for payment in payments {
                if let Ok((new_paid, _)) = settle(total, stored, payment) {
                    stored = new_paid;
                }
                prop_assert!(stored <= total);
            }
        }
    }
}
