use std::path::Path;

use super::{ImportReport, StepDelimiter};
use crate::error::RecipeError;
use crate::models::{Ingredient, Recipe};

const REQUIRED_COLUMNS: [&str; 4] = ["title", "ingredients", "steps", "tags"];

struct Columns {
    title: usize,
    ingredients: usize,
    steps: usize,
    tags: usize,
    servings: Option<usize>,
    source_url: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &::csv::StringRecord, path: &Path) -> Result<Self, RecipeError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|c| find(*c).is_none()) {
            return Err(RecipeError::format(
                path,
                1,
                format!("missing required column '{}'", missing),
            ));
        }

        Ok(Self {
            title: find("title").unwrap_or_default(),
            ingredients: find("ingredients").unwrap_or_default(),
            steps: find("steps").unwrap_or_default(),
            tags: find("tags").unwrap_or_default(),
            servings: find("servings"),
            source_url: find("source_url"),
        })
    }
}

/// Parse CSV with a header row.
///
/// `ingredients` holds comma-separated `name:quantity` pairs, `tags` is
/// comma-separated and `steps` uses `delimiter`. Short rows are read with
/// the missing fields empty.
pub fn parse_csv(
    contents: &str,
    path: &Path,
    delimiter: StepDelimiter,
) -> Result<ImportReport, RecipeError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| RecipeError::format(path, 1, e.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers, path)?;

    let mut report = ImportReport::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
            RecipeError::format(path, line, e.to_string())
        })?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let servings = match columns.servings.map(field).filter(|s| !s.is_empty()) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    report.skip(format!("row {}", row), format!("invalid servings '{}'", raw));
                    continue;
                }
            },
            None => None,
        };

        let recipe = Recipe {
            title: field(columns.title).to_string(),
            ingredients: Ingredient::parse_list(field(columns.ingredients)),
            steps: field(columns.steps)
                .split(delimiter.as_char())
                .map(String::from)
                .collect(),
            tags: field(columns.tags).split(',').map(String::from).collect(),
            servings,
            source_url: columns.source_url.map(|i| field(i).to_string()),
        };
        report.accept(format!("row {}", row), recipe);
    }

    Ok(report)
}
