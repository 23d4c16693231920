//! JSON Lines recipe store.
//!
//! Every write rewrites the whole file: the new content goes to a sibling
//! temporary file which then replaces the original.

use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::RecipeStore;
use crate::error::RecipeError;
use crate::models::{title_key, Recipe};

#[derive(Clone, Debug)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Reads the file; a missing file is an empty store.
    fn read(&self) -> Result<Vec<Recipe>, RecipeError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RecipeError::io(&self.path, e)),
        };

        let mut recipes = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let recipe: Recipe = serde_json::from_str(line)
                .map_err(|e| RecipeError::format(&self.path, idx + 1, e.to_string()))?;
            recipes.push(recipe);
        }
        tracing::debug!("Loaded {} recipe(s) from {}", recipes.len(), self.path.display());
        Ok(recipes)
    }

    fn write(&self, recipes: &[Recipe]) -> Result<(), RecipeError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RecipeError::io(parent, e))?;
        }

        let mut contents = String::new();
        for recipe in recipes {
            contents.push_str(&serde_json::to_string(recipe)?);
            contents.push('\n');
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, contents).map_err(|e| RecipeError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| RecipeError::io(&self.path, e))?;

        tracing::debug!("Wrote {} recipe(s) to {}", recipes.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RecipeStore for JsonlStore {
    async fn load_all(&self) -> Result<Vec<Recipe>, RecipeError> {
        self.read()
    }

    async fn save_all(&self, recipes: &[Recipe]) -> Result<(), RecipeError> {
        self.write(recipes)
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        let mut recipes = self.read()?;
        let key = recipe.key();
        if recipes.iter().any(|r| r.key() == key) {
            return Err(RecipeError::Duplicate(recipe.title.clone()));
        }
        recipes.push(recipe.clone());
        self.write(&recipes)
    }

    async fn upsert(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        let mut recipes = self.read()?;
        let key = recipe.key();
        match recipes.iter_mut().find(|r| r.key() == key) {
            Some(existing) => *existing = recipe.clone(),
            None => recipes.push(recipe.clone()),
        }
        self.write(&recipes)
    }

    async fn delete(&self, title: &str) -> Result<(), RecipeError> {
        let mut recipes = self.read()?;
        let key = title_key(title);
        let before = recipes.len();
        recipes.retain(|r| r.key() != key);
        if recipes.len() == before {
            return Err(RecipeError::NotFound(title.trim().to_string()));
        }
        self.write(&recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use tempfile::TempDir;

    fn test_store() -> (JsonlStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlStore::new(temp_dir.path().join("recipes.jsonl"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_writes_one_object_per_line() {
        let (store, _temp) = test_store();
        store
            .save_all(&[
                Recipe::new("A").with_ingredients(vec![Ingredient::new("x", "1")]),
                Recipe::new("B").with_ingredients(vec![Ingredient::new("y", "2g")]),
            ])
            .await
            .unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["title"], "A");
        assert_eq!(first["ingredients"][0]["quantity"], "1");
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = JsonlStore::new(nested.join("recipes.jsonl"));
        store.save_all(&[]).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_reads_legacy_map_ingredients_and_blank_lines() {
        let (store, _temp) = test_store();
        fs::write(
            store.path(),
            "{\"title\": \"Toast\", \"ingredients\": {\"bread\": \"2 slices\"}, \"steps\": [\"Toast\"]}\n\n",
        )
        .unwrap();

        let recipes = store.load_all().await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].ingredients, vec![Ingredient::new("bread", "2 slices")]);
    }

    #[tokio::test]
    async fn test_corrupt_line_reports_line_number() {
        let (store, _temp) = test_store();
        fs::write(
            store.path(),
            "{\"title\": \"Ok\", \"ingredients\": []}\n{not json\n",
        )
        .unwrap();

        let err = store.load_all().await.unwrap_err();
        match err {
            RecipeError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
