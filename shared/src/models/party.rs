//! Trading party domain

use serde::{Deserialize, Serialize};

/// Kind of trading party
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartyType {
    Supplier,
    Customer,
}

impl PartyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyType::Supplier => "supplier",
            PartyType::Customer => "customer",
        }
    }
}

impl std::str::FromStr for PartyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supplier" => Ok(PartyType::Supplier),
            "customer" => Ok(PartyType::Customer),
            other => Err(format!("Unknown party type: {}", other)),
        }
    }
}

impl std::fmt::Display for PartyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
