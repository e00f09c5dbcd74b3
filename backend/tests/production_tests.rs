//! Milling batch tests
//!
//! Tests for batch yield computation and the batch stock contract:
//! one wheat withdrawal plus one receipt per output, all under the
//! batch number.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{replay_stock, yield_percent, MovementType};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Typical milling split: 72% flour, 25% bran, 3% loss
    #[test]
    fn test_yield_typical_batch() {
        let outputs = [dec("720"), dec("250")];
        assert_eq!(yield_percent(dec("1000"), &outputs), dec("97"));
    }

    #[test]
    fn test_yield_single_output() {
        assert_eq!(yield_percent(dec("200"), &[dec("150")]), dec("75"));
    }

    /// Zero wheat input yields zero instead of dividing by zero
    #[test]
    fn test_yield_zero_input() {
        assert_eq!(yield_percent(Decimal::ZERO, &[dec("10")]), Decimal::ZERO);
        assert_eq!(yield_percent(dec("-5"), &[dec("10")]), Decimal::ZERO);
    }

    #[test]
    fn test_yield_no_outputs() {
        assert_eq!(yield_percent(dec("1000"), &[]), Decimal::ZERO);
    }

    /// A batch's ledger effect on the wheat item is a single withdrawal
    #[test]
    fn test_batch_wheat_effect() {
        let wheat_ledger = vec![
            (MovementType::In, dec("1000")), // purchase
            (MovementType::Out, dec("600")), // batch
        ];
        assert_eq!(replay_stock(wheat_ledger), dec("400"));
    }

    /// Output items start at zero and hold exactly what batches produced
    #[test]
    fn test_batch_output_effect() {
        let flour_ledger = vec![
            (MovementType::In, dec("432")), // batch 1
            (MovementType::In, dec("360")), // batch 2
            (MovementType::Out, dec("500")), // sale
        ];
        assert_eq!(replay_stock(flour_ledger), dec("292"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Yield is positive whenever wheat and outputs are positive
        #[test]
        fn prop_yield_positive(
            wheat in quantity_strategy(),
            outputs in prop::collection::vec(quantity_strategy(), 1..5)
        ) {
            prop_assert!(yield_percent(wheat, &outputs) > Decimal::ZERO);
        }

        /// Adding an output strictly increases the yield
        #[test]
        fn prop_yield_monotonic_in_outputs(
            wheat in quantity_strategy(),
            outputs in prop::collection::vec(quantity_strategy(), 1..5),
            extra in quantity_strategy()
        ) {
            let base = yield_percent(wheat, &outputs);
            let mut extended = outputs;
            extended.push(extra);
            prop_assert!(yield_percent(wheat, &extended) > base);
        }

        /// Output total at or below the wheat input keeps yield at or
        /// below 100
        #[test]
        fn prop_yield_bounded_by_mass(
            outputs in prop::collection::vec(quantity_strategy(), 1..5)
        ) {
            let total: Decimal = outputs.iter().copied().sum();
            let yield_pct = yield_percent(total, &outputs);
            prop_assert_eq!(yield_pct, Decimal::ONE_HUNDRED);
        }

        /// A batch leaves the combined ledgers balanced: wheat down by the
        /// input, outputs up by their quantities
        #[test]
        fn prop_batch_ledger_effect(
            wheat_stock in quantity_strategy(),
            outputs in prop::collection::vec(quantity_strategy(), 1..5)
        ) {
            // Consume at most what is on hand
            let consumed = wheat_stock;
            let wheat_after = replay_stock(vec![
                (MovementType::In, wheat_stock),
                (MovementType::Out, consumed),
            ]);
            prop_assert_eq!(wheat_after, Decimal::ZERO);

            for output in &outputs {
                let item_after = replay_stock(vec![(MovementType::In, *output)]);
                prop_assert_eq!(item_after, *output);
            }
        }
    }
}
