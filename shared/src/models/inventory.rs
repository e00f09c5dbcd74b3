//! Stock-ledger domain: movement direction, status derivation, replay

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }

    /// Signed contribution of one unit of this movement to the stock aggregate
    pub fn sign(&self) -> Decimal {
        match self {
            MovementType::In => Decimal::ONE,
            MovementType::Out => Decimal::NEGATIVE_ONE,
        }
    }
}

impl std::str::FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(MovementType::In),
            "out" => Ok(MovementType::Out),
            other => Err(format!("Unknown movement type: {}", other)),
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stock level status, derived from current and minimum stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Active,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Derive the status from stock levels.
    ///
    /// Stock exactly at the minimum counts as low, so a minimum of 100
    /// with 100 on hand still warns.
    pub fn derive(current_stock: Decimal, minimum_stock: Decimal) -> Self {
        if current_stock <= Decimal::ZERO {
            StockStatus::OutOfStock
        } else if current_stock <= minimum_stock {
            StockStatus::LowStock
        } else {
            StockStatus::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Active => "active",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StockStatus::Active),
            "low_stock" => Ok(StockStatus::LowStock),
            "out_of_stock" => Ok(StockStatus::OutOfStock),
            other => Err(format!("Unknown stock status: {}", other)),
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::Active => write!(f, "Active"),
            StockStatus::LowStock => write!(f, "Low Stock"),
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// Fold a sequence of (type, quantity) pairs into a net stock total.
///
/// This is the ledger-replay definition of current stock; the cached
/// aggregate on an item must always agree with it.
pub fn replay_stock<I>(movements: I) -> Decimal
where
    I: IntoIterator<Item = (MovementType, Decimal)>,
{
    movements
        .into_iter()
        .fold(Decimal::ZERO, |acc, (movement_type, quantity)| {
            acc + movement_type.sign() * quantity
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_status_at_minimum_is_low() {
        assert_eq!(
            StockStatus::derive(dec("100"), dec("100")),
            StockStatus::LowStock
        );
        assert_eq!(
            StockStatus::derive(dec("101"), dec("100")),
            StockStatus::Active
        );
    }

    #[test]
    fn test_status_zero_or_below_is_out() {
        assert_eq!(
            StockStatus::derive(Decimal::ZERO, dec("10")),
            StockStatus::OutOfStock
        );
        assert_eq!(
            StockStatus::derive(dec("-5"), dec("10")),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn test_replay_signed_sum() {
        let movements = vec![
            (MovementType::In, dec("50")),
            (MovementType::In, dec("30")),
            (MovementType::Out, dec("20")),
            (MovementType::Out, dec("15")),
        ];
        assert_eq!(replay_stock(movements), dec("45"));
    }

    #[test]
    fn test_replay_empty_is_zero() {
        assert_eq!(replay_stock(Vec::new()), Decimal::ZERO);
    }
}
