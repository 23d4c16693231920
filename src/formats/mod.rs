//! Conversion between recipe files and the stored recipe shape.
//!
//! Importers are tolerant: a record that is present but unusable (no title,
//! no ingredients, wrong field types) is skipped and reported, and the rest
//! of the file still imports. A file that cannot be read as its format at
//! all fails with `RecipeError::Format` and imports nothing.

mod csv;
mod json;
mod snapshot;

pub use self::csv::parse_csv;
pub use self::json::{parse_json, parse_jsonl, to_json, to_jsonl};
pub use self::snapshot::to_snapshot;

use clap::ValueEnum;
use std::fmt;
use std::path::Path;

use crate::error::RecipeError;
use crate::models::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    Csv,
    Json,
    Jsonl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Jsonl,
}

/// How the `steps` column of a CSV file separates instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StepDelimiter {
    #[default]
    Pipe,
    Comma,
}

impl StepDelimiter {
    pub fn as_char(self) -> char {
        match self {
            StepDelimiter::Pipe => '|',
            StepDelimiter::Comma => ',',
        }
    }
}

/// A record that was left out of an import, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    /// Where the record sits in its file, e.g. "row 3" or "line 7".
    pub location: String,
    pub reason: String,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// Outcome of reading an import file.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Valid, normalized recipes in file order.
    pub recipes: Vec<Recipe>,
    pub skipped: Vec<Skipped>,
}

impl ImportReport {
    /// Number of records the file contained.
    pub fn total(&self) -> usize {
        self.recipes.len() + self.skipped.len()
    }

    pub fn skip(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        let skipped = Skipped {
            location: location.into(),
            reason: reason.into(),
        };
        tracing::warn!("Skipping {}", skipped);
        self.skipped.push(skipped);
    }

    /// Normalize and validate `recipe`, keeping it or recording why not.
    pub(crate) fn accept(&mut self, location: String, recipe: Recipe) {
        match recipe.into_valid() {
            Ok(recipe) => self.recipes.push(recipe),
            Err(RecipeError::Validation(reason)) => self.skip(location, reason),
            Err(e) => self.skip(location, e.to_string()),
        }
    }
}

/// Read and parse an import file.
pub fn read_import(
    path: &Path,
    format: ImportFormat,
    delimiter: StepDelimiter,
) -> Result<ImportReport, RecipeError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RecipeError::io(path, e))?;
    let report = match format {
        ImportFormat::Csv => parse_csv(&contents, path, delimiter)?,
        ImportFormat::Json => parse_json(&contents, path)?,
        ImportFormat::Jsonl => parse_jsonl(&contents, path)?,
    };
    tracing::debug!(
        "Read {} of {} record(s) from {}",
        report.recipes.len(),
        report.total(),
        path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use tempfile::TempDir;

    fn sample() -> Vec<Recipe> {
        vec![
            Recipe::new("Spaghetti Aglio e Olio")
                .with_ingredients(vec![
                    Ingredient::new("spaghetti", "200g"),
                    Ingredient::new("garlic", "3 cloves"),
                ])
                .with_steps(["Boil pasta", "Saute garlic"])
                .with_tags(["italian", "vegetarian"]),
            Recipe::new("Toast")
                .with_ingredients(vec![Ingredient::new("bread", "2 slices")])
                .with_servings(1)
                .with_source_url("https://example.com/toast"),
        ]
    }

    #[test]
    fn test_report_counts() {
        let mut report = ImportReport::default();
        report.accept("row 2".into(), sample().remove(0));
        report.accept("row 3".into(), Recipe::new(""));
        assert_eq!(report.total(), 2);
        assert_eq!(report.recipes.len(), 1);
        assert_eq!(report.skipped[0].to_string(), "row 3: title is required");
    }

    #[test]
    fn test_export_then_import_json_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.json");
        std::fs::write(&path, to_json(&sample()).unwrap()).unwrap();

        let report = read_import(&path, ImportFormat::Json, StepDelimiter::Pipe).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.recipes, sample());
    }

    #[test]
    fn test_export_then_import_jsonl_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");
        std::fs::write(&path, to_jsonl(&sample()).unwrap()).unwrap();

        let report = read_import(&path, ImportFormat::Jsonl, StepDelimiter::Pipe).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.recipes, sample());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_import(
            &temp_dir.path().join("missing.csv"),
            ImportFormat::Csv,
            StepDelimiter::Pipe,
        )
        .unwrap_err();
        assert!(matches!(err, RecipeError::Io { .. }));
    }
}
