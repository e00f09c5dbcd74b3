//! Product catalog domain

use serde::{Deserialize, Serialize};

/// Categories of mill products
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// Raw wheat purchased from suppliers
    Wheat,
    /// Milled flour grades (fine, super, chakki)
    Flour,
    /// Milling by-product
    Bran,
    /// Packaging bags
    Bag,
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Wheat => "wheat",
            ProductCategory::Flour => "flour",
            ProductCategory::Bran => "bran",
            ProductCategory::Bag => "bag",
            ProductCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wheat" => Ok(ProductCategory::Wheat),
            "flour" => Ok(ProductCategory::Flour),
            "bran" => Ok(ProductCategory::Bran),
            "bag" => Ok(ProductCategory::Bag),
            "other" => Ok(ProductCategory::Other),
            other => Err(format!("Unknown product category: {}", other)),
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
