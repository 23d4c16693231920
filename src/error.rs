//! Error types shared by the store, the importers and the commands.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    /// A recipe is missing a required field or carries an invalid value.
    #[error("Invalid recipe: {0}")]
    Validation(String),

    /// No recipe with the given title exists in the store.
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// A recipe with the same title is already stored.
    #[error("Recipe with title '{0}' already exists")]
    Duplicate(String),

    /// A file could not be parsed at all; `line` is the 1-based line, row or item.
    #[error("Malformed file {}: line {line}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl RecipeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecipeError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        RecipeError::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
