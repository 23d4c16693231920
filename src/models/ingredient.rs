use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::Quantity;

/// One ingredient line of a recipe, stored exactly as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub quantity: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }

    /// Parse `name:quantity`, splitting on the first colon.
    ///
    /// Without a colon the whole string is the name and the quantity is empty.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((name, quantity)) => Self::new(name.trim(), quantity.trim()),
            None => Self::new(raw.trim(), ""),
        }
    }

    /// Parse a comma-separated list of `name:quantity` pairs, ignoring blank items.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .filter(|item| !item.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn parsed_quantity(&self) -> Quantity {
        Quantity::parse(&self.quantity)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.quantity, self.name)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Quantities written by hand in JSON are sometimes bare numbers (`"egg": 2`).
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(n) => n.to_string(),
        TextOrNumber::Float(n) => n.to_string(),
    })
}
