//! Moving recipes in and out of the store.

use clap::Args;
use std::path::{Path, PathBuf};

use crate::db::RecipeStore;
use crate::error::RecipeError;
use crate::formats::{
    read_import, to_json, to_jsonl, to_snapshot, ExportFormat, ImportFormat, ImportReport,
    StepDelimiter,
};

/// Import recipes from a CSV, JSON or JSONL file
#[derive(Args)]
pub struct ImportCommand {
    /// File format
    #[arg(long, value_enum)]
    format: ImportFormat,

    /// File to read
    #[arg(long, short)]
    file: PathBuf,

    /// How the CSV `steps` column separates steps
    #[arg(long, value_enum, default_value = "pipe")]
    step_delimiter: StepDelimiter,
}

impl ImportCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let report = read_import(&self.file, self.format, self.step_delimiter)?;
        let report = store_imported(store, report).await?;

        println!(
            "Imported {} of {} recipes, {} skipped",
            report.recipes.len(),
            report.total(),
            report.skipped.len()
        );
        for skipped in &report.skipped {
            println!("  {}", skipped);
        }
        Ok(())
    }
}

/// Insert every recipe the file yielded. Titles already in the store are
/// moved to the skipped list; any other store failure aborts.
async fn store_imported(
    store: &dyn RecipeStore,
    report: ImportReport,
) -> Result<ImportReport, RecipeError> {
    let ImportReport { recipes, skipped } = report;
    let mut result = ImportReport {
        recipes: Vec::with_capacity(recipes.len()),
        skipped,
    };

    for recipe in recipes {
        match store.insert(&recipe).await {
            Ok(()) => result.recipes.push(recipe),
            Err(RecipeError::Duplicate(title)) => {
                result.skip(format!("\"{}\"", title), "already exists");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(result)
}

/// Export all recipes as JSON or JSONL
#[derive(Args)]
pub struct ExportCommand {
    /// File format
    #[arg(long, value_enum, default_value = "json")]
    format: ExportFormat,

    /// File to write
    #[arg(long, short)]
    out: PathBuf,
}

impl ExportCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let recipes = store.load_all().await?;
        let contents = match self.format {
            ExportFormat::Json => to_json(&recipes)?,
            ExportFormat::Jsonl => to_jsonl(&recipes)?,
        };
        write_file(&self.out, &contents)?;
        println!("Exported {} recipes to {}", recipes.len(), self.out.display());
        Ok(())
    }
}

/// Write the denormalized publishing snapshot
#[derive(Args)]
pub struct SnapshotCommand {
    /// File to write
    #[arg(long, short)]
    out: PathBuf,
}

impl SnapshotCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let recipes = store.load_all().await?;
        write_file(&self.out, &to_snapshot(&recipes)?)?;
        println!("Wrote snapshot: {}", self.out.display());
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), RecipeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| RecipeError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| RecipeError::io(path, e))
}
