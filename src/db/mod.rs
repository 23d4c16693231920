mod jsonl_store;
mod sqlite_store;

pub use jsonl_store::JsonlStore;
pub use sqlite_store::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RecipeError;
use crate::models::{title_key, Recipe};

/// Which on-disk representation holds the recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON object per line
    Jsonl,
    /// A single SQLite table
    Sqlite,
}

impl Backend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "jsonl" => Some(Backend::Jsonl),
            "sqlite" => Some(Backend::Sqlite),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Jsonl => write!(f, "jsonl"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Pick the backend for a store path when none is configured.
///
/// `.jsonl` and unknown extensions use JSONL; SQLite extensions use SQLite.
/// A path without any extension gets `.jsonl` appended.
pub fn resolve_store(path: &Path, backend: Option<Backend>) -> (PathBuf, Backend) {
    if let Some(backend) = backend {
        return (path.to_path_buf(), backend);
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("db" | "sqlite" | "sqlite3") => (path.to_path_buf(), Backend::Sqlite),
        Some(_) => (path.to_path_buf(), Backend::Jsonl),
        None => (path.with_extension("jsonl"), Backend::Jsonl),
    }
}

/// Persistence for recipes, keyed by title (case-insensitive).
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Every stored recipe, in insertion order.
    async fn load_all(&self) -> Result<Vec<Recipe>, RecipeError>;

    /// Replace the whole store with `recipes`.
    async fn save_all(&self, recipes: &[Recipe]) -> Result<(), RecipeError>;

    /// Add a recipe; fails with `Duplicate` if the title is taken.
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipeError>;

    /// Add a recipe or replace the one with the same title in place.
    async fn upsert(&self, recipe: &Recipe) -> Result<(), RecipeError>;

    /// Remove a recipe; fails with `NotFound` and leaves the store untouched
    /// if no recipe has that title.
    async fn delete(&self, title: &str) -> Result<(), RecipeError>;

    async fn get(&self, title: &str) -> Result<Option<Recipe>, RecipeError> {
        let key = title_key(title);
        Ok(self.load_all().await?.into_iter().find(|r| r.key() == key))
    }

    async fn count(&self) -> Result<usize, RecipeError> {
        Ok(self.load_all().await?.len())
    }
}

/// Open the store at `path`, creating it on first use.
pub async fn open_store(
    path: &Path,
    backend: Option<Backend>,
) -> Result<Box<dyn RecipeStore>, RecipeError> {
    let (path, backend) = resolve_store(path, backend);
    tracing::debug!("Opening {} store at {}", backend, path.display());

    Ok(match backend {
        Backend::Jsonl => Box::new(JsonlStore::new(path)),
        Backend::Sqlite => Box::new(SqliteStore::open(&path).await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use tempfile::TempDir;

    fn recipe(title: &str) -> Recipe {
        Recipe::new(title).with_ingredients(vec![Ingredient::new("flour", "200g")])
    }

    async fn stores() -> (Vec<Box<dyn RecipeStore>>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let jsonl = open_store(&temp_dir.path().join("recipes.jsonl"), None)
            .await
            .unwrap();
        let sqlite = open_store(&temp_dir.path().join("recipes.db"), None)
            .await
            .unwrap();
        (vec![jsonl, sqlite], temp_dir)
    }

    #[test]
    fn test_resolve_store_by_extension() {
        let (path, backend) = resolve_store(Path::new("/data/recipes.jsonl"), None);
        assert_eq!(backend, Backend::Jsonl);
        assert_eq!(path, PathBuf::from("/data/recipes.jsonl"));

        for name in ["r.db", "r.sqlite", "r.SQLITE3"] {
            let (_, backend) = resolve_store(Path::new(name), None);
            assert_eq!(backend, Backend::Sqlite, "{name}");
        }

        let (_, backend) = resolve_store(Path::new("recipes.txt"), None);
        assert_eq!(backend, Backend::Jsonl);
    }

    #[test]
    fn test_resolve_store_appends_jsonl_extension() {
        let (path, backend) = resolve_store(Path::new("/data/recipes"), None);
        assert_eq!(backend, Backend::Jsonl);
        assert_eq!(path, PathBuf::from("/data/recipes.jsonl"));
    }

    #[test]
    fn test_resolve_store_explicit_backend_wins() {
        let (path, backend) = resolve_store(Path::new("/data/recipes"), Some(Backend::Sqlite));
        assert_eq!(backend, Backend::Sqlite);
        assert_eq!(path, PathBuf::from("/data/recipes"));
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(Backend::parse("JSONL"), Some(Backend::Jsonl));
        assert_eq!(Backend::parse(" sqlite "), Some(Backend::Sqlite));
        assert_eq!(Backend::parse("csv"), None);
    }

    #[tokio::test]
    async fn test_insert_and_load_keeps_order() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("Soup")).await.unwrap();
            store.insert(&recipe("Bread")).await.unwrap();
            store.insert(&recipe("Salad")).await.unwrap();

            let titles: Vec<String> = store
                .load_all()
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.title)
                .collect();
            assert_eq!(titles, vec!["Soup", "Bread", "Salad"]);
        }
    }

    #[tokio::test]
    async fn test_insert_duplicate_title_fails() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("Chicken Curry")).await.unwrap();
            let err = store.insert(&recipe("chicken curry ")).await.unwrap_err();
            assert!(matches!(err, RecipeError::Duplicate(_)));
            assert_eq!(store.count().await.unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn test_get_is_case_insensitive() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("Chicken Curry")).await.unwrap();
            let found = store.get("CHICKEN CURRY").await.unwrap().unwrap();
            assert_eq!(found.title, "Chicken Curry");
            assert!(store.get("Curry").await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_fields() {
        let (stores, _temp) = stores().await;
        let full = Recipe::new("Pancakes")
            .with_ingredients(vec![
                Ingredient::new("flour", "200g"),
                Ingredient::new("salt", "a pinch"),
            ])
            .with_steps(["Mix", "Fry"])
            .with_tags(["breakfast"])
            .with_servings(4)
            .with_source_url("https://example.com/pancakes");
        for store in &stores {
            store.insert(&full).await.unwrap();
            assert_eq!(store.load_all().await.unwrap(), vec![full.clone()]);
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("A")).await.unwrap();
            store.insert(&recipe("B")).await.unwrap();

            let replacement = Recipe::new("a")
                .with_ingredients(vec![Ingredient::new("sugar", "1 tbsp")]);
            store.upsert(&replacement).await.unwrap();
            store.upsert(&recipe("C")).await.unwrap();

            let all = store.load_all().await.unwrap();
            assert_eq!(all.len(), 3);
            assert_eq!(all[0], replacement);
            assert_eq!(all[1].title, "B");
            assert_eq!(all[2].title, "C");
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("A")).await.unwrap();
            store.insert(&recipe("B")).await.unwrap();
            store.delete(" a ").await.unwrap();
            let all = store.load_all().await.unwrap();
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].title, "B");
        }
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_store_unchanged() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("A")).await.unwrap();
            store.insert(&recipe("B")).await.unwrap();
            let before = store.load_all().await.unwrap();

            let err = store.delete("Nope").await.unwrap_err();
            assert!(matches!(err, RecipeError::NotFound(_)));
            assert_eq!(store.load_all().await.unwrap(), before);
        }
    }

    #[tokio::test]
    async fn test_save_all_replaces_everything() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            store.insert(&recipe("Old")).await.unwrap();
            store
                .save_all(&[recipe("New 1"), recipe("New 2")])
                .await
                .unwrap();
            let titles: Vec<String> = store
                .load_all()
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.title)
                .collect();
            assert_eq!(titles, vec!["New 1", "New 2"]);

            store.save_all(&[]).await.unwrap();
            assert_eq!(store.count().await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let (stores, _temp) = stores().await;
        for store in &stores {
            assert!(store.load_all().await.unwrap().is_empty());
        }
    }
}
