//! Employee and attendance tests
//!
//! Tests for attendance bookkeeping including:
//! - Payable day weights per status
//! - One mark per employee per day (later marks overwrite)
//! - Monthly payable-day totals

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use shared::models::AttendanceStatus;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payable_day_weights() {
        assert_eq!(AttendanceStatus::Present.payable_days(), Decimal::ONE);
        assert_eq!(AttendanceStatus::HalfDay.payable_days(), Decimal::new(5, 1));
        assert_eq!(AttendanceStatus::Absent.payable_days(), Decimal::ZERO);
        assert_eq!(AttendanceStatus::Leave.payable_days(), Decimal::ZERO);
    }

    #[test]
    fn test_status_strings_round_trip() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Leave,
            AttendanceStatus::HalfDay,
        ] {
            assert_eq!(
                AttendanceStatus::from_str(status.as_str()).unwrap(),
                status
            );
        }
    }

    /// 20 present + 2 half days = 21 payable days
    #[test]
    fn test_monthly_payable_total() {
        let marks = [(AttendanceStatus::Present, 20), (AttendanceStatus::HalfDay, 2)];
        let total: Decimal = marks
            .iter()
            .map(|(status, days)| status.payable_days() * Decimal::from(*days))
            .sum();
        assert_eq!(total, Decimal::from(21));
    }

    /// Marking the same day twice keeps only the later status
    #[test]
    fn test_remark_overwrites() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut sheet: HashMap<NaiveDate, AttendanceStatus> = HashMap::new();

        sheet.insert(day, AttendanceStatus::Absent);
        sheet.insert(day, AttendanceStatus::Present);

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet[&day], AttendanceStatus::Present);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = AttendanceStatus> {
        prop_oneof![
            Just(AttendanceStatus::Present),
            Just(AttendanceStatus::Absent),
            Just(AttendanceStatus::Leave),
            Just(AttendanceStatus::HalfDay),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Payable days per mark are always between zero and one
        #[test]
        fn prop_payable_weight_bounded(status in status_strategy()) {
            let weight = status.payable_days();
            prop_assert!(weight >= Decimal::ZERO);
            prop_assert!(weight <= Decimal::ONE);
        }

        /// Monthly payable days never exceed the number of marked days
        #[test]
        fn prop_monthly_total_bounded(
            marks in prop::collection::vec(status_strategy(), 0..31)
        ) {
            let total: Decimal = marks.iter().map(|s| s.payable_days()).sum();
            prop_assert!(total >= Decimal::ZERO);
            prop_assert!(total <= Decimal::from(marks.len() as i64));
        }

        /// Overwriting marks for one day leaves exactly one row,
        /// holding the last status written
        #[test]
        fn prop_one_mark_per_day(
            day_offset in 0u32..28u32,
            statuses in prop::collection::vec(status_strategy(), 1..5)
        ) {
            let day = NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(day_offset as u64))
                .unwrap();

            let mut sheet: HashMap<NaiveDate, AttendanceStatus> = HashMap::new();
            for status in &statuses {
                sheet.insert(day, *status);
            }

            prop_assert_eq!(sheet.len(), 1);
            prop_assert_eq!(sheet[&day], *statuses.last().unwrap());
        }
    }
}
