//! User role domain

use serde::{Deserialize, Serialize};

/// Roles a user can hold within a mill
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Manager,
    Operator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Manager => "manager",
            UserRole::Operator => "operator",
        }
    }

    /// Whether this role may run maintenance operations such as a
    /// full stock recalculation
    pub fn can_run_maintenance(&self) -> bool {
        matches!(self, UserRole::Owner | UserRole::Manager)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(UserRole::Owner),
            "manager" => Ok(UserRole::Manager),
            "operator" => Ok(UserRole::Operator),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
