//! Grocery list aggregation.
//!
//! Ingredients from a selection of recipes are merged by name. Quantities
//! that share a unit (compared case-insensitively) are summed; anything that
//! does not parse as a number is listed verbatim, once per distinct text.
//! Names are matched exactly after trimming, so "Egg" and "egg" stay apart.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::models::{format_measure, Quantity, Recipe};

/// One part of an aggregated quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum GroceryAmount {
    /// Sum of every parsed quantity with this unit.
    Total {
        amount: f64,
        unit: String,
        spaced: bool,
    },
    /// A quantity that could not be summed, kept as written.
    Listed(String),
}

impl fmt::Display for GroceryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroceryAmount::Total {
                amount,
                unit,
                spaced,
            } => write!(f, "{}", format_measure(*amount, unit, *spaced)),
            GroceryAmount::Listed(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroceryLine {
    pub name: String,
    pub amounts: Vec<GroceryAmount>,
}

impl GroceryLine {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            amounts: Vec::new(),
        }
    }

    fn add(&mut self, quantity: Quantity) {
        let unit_key = quantity.unit_key();
        match quantity {
            Quantity::Measured {
                amount,
                unit,
                spaced,
            } => {
                let existing = self.amounts.iter_mut().find_map(|a| match a {
                    GroceryAmount::Total {
                        amount: total,
                        unit: u,
                        ..
                    } if unit_key.as_deref() == Some(u.to_lowercase().as_str()) => Some(total),
                    _ => None,
                });
                match existing {
                    Some(total) => *total += amount,
                    None => self.amounts.push(GroceryAmount::Total {
                        amount,
                        unit,
                        spaced,
                    }),
                }
            }
            Quantity::Unparsed(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return;
                }
                let seen = self
                    .amounts
                    .iter()
                    .any(|a| matches!(a, GroceryAmount::Listed(t) if t == text));
                if !seen {
                    self.amounts.push(GroceryAmount::Listed(text.to_string()));
                }
            }
        }
    }

    /// The aggregated quantity as displayed, e.g. `"1 tsp, a pinch"`.
    pub fn quantity(&self) -> String {
        self.amounts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GroceryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amounts.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} - {}", self.name, self.quantity())
        }
    }
}

/// Grocery lines in the order their ingredient was first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroceryList {
    lines: Vec<GroceryLine>,
}

impl GroceryList {
    pub fn aggregate<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        let mut lines: Vec<GroceryLine> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for recipe in recipes {
            for ingredient in &recipe.ingredients {
                let name = ingredient.name.trim();
                let pos = *index.entry(name.to_string()).or_insert_with(|| {
                    lines.push(GroceryLine::new(name));
                    lines.len() - 1
                });
                lines[pos].add(ingredient.parsed_quantity());
            }
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[GroceryLine] {
        &self.lines
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&GroceryLine> {
        self.lines().iter().find(|l| l.name == name)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// JSON rendering: `[{"name": ..., "quantity": ...}]`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            name: &'a str,
            quantity: String,
        }

        let entries: Vec<Entry> = self
            .lines
            .iter()
            .map(|l| Entry {
                name: &l.name,
                quantity: l.quantity(),
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
}

impl fmt::Display for GroceryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
