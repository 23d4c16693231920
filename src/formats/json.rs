use serde_json::Value;
use std::path::Path;

use super::ImportReport;
use crate::error::RecipeError;
use crate::models::Recipe;

/// Parse a JSON array of recipe objects.
pub fn parse_json(contents: &str, path: &Path) -> Result<ImportReport, RecipeError> {
    let items: Vec<Value> = serde_json::from_str(contents)
        .map_err(|e| RecipeError::format(path, e.line(), e.to_string()))?;

    let mut report = ImportReport::default();
    for (idx, item) in items.into_iter().enumerate() {
        let location = format!("item {}", idx + 1);
        match serde_json::from_value::<Recipe>(item) {
            Ok(recipe) => report.accept(location, recipe),
            Err(e) => report.skip(location, e.to_string()),
        }
    }
    Ok(report)
}

/// Parse one recipe object per line; blank lines are ignored.
pub fn parse_jsonl(contents: &str, path: &Path) -> Result<ImportReport, RecipeError> {
    let mut report = ImportReport::default();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let item: Value = serde_json::from_str(line)
            .map_err(|e| RecipeError::format(path, idx + 1, e.to_string()))?;

        let location = format!("line {}", idx + 1);
        match serde_json::from_value::<Recipe>(item) {
            Ok(recipe) => report.accept(location, recipe),
            Err(e) => report.skip(location, e.to_string()),
        }
    }
    Ok(report)
}

pub fn to_json(recipes: &[Recipe]) -> Result<String, RecipeError> {
    let mut out = serde_json::to_string_pretty(recipes)?;
    out.push('\n');
    Ok(out)
}

pub fn to_jsonl(recipes: &[Recipe]) -> Result<String, RecipeError> {
    let mut out = String::new();
    for recipe in recipes {
        out.push_str(&serde_json::to_string(recipe)?);
        out.push('\n');
    }
    Ok(out)
}
