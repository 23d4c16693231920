use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::Path;

use super::RecipeStore;
use crate::error::RecipeError;
use crate::models::{title_key, Ingredient, Recipe};

/// Recipes in a single SQLite table; list fields are stored as JSON text.
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct RecipeRow {
    title: String,
    ingredients_json: String,
    steps_json: String,
    tags_json: String,
    servings: Option<i64>,
    source_url: Option<String>,
}

impl RecipeRow {
    fn into_recipe(self) -> Result<Recipe, RecipeError> {
        let ingredients: Vec<Ingredient> = serde_json::from_str(&self.ingredients_json)?;
        Ok(Recipe {
            title: self.title,
            ingredients,
            steps: serde_json::from_str(&self.steps_json)?,
            tags: serde_json::from_str(&self.tags_json)?,
            servings: self.servings.and_then(|s| u32::try_from(s).ok()),
            source_url: self.source_url,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT title, ingredients_json, steps_json, tags_json, servings, source_url FROM recipes";

const UPSERT_SQL: &str = r#"
    INSERT INTO recipes (title, title_key, ingredients_json, steps_json, tags_json, servings, source_url)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(title_key) DO UPDATE SET
        title = excluded.title,
        ingredients_json = excluded.ingredients_json,
        steps_json = excluded.steps_json,
        tags_json = excluded.tags_json,
        servings = excluded.servings,
        source_url = excluded.source_url
"#;

impl SqliteStore {
    /// Open (or create) the database and run migrations.
    pub async fn open(path: &Path) -> Result<Self, RecipeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| RecipeError::io(parent, e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    async fn write_row(
        tx: &mut Transaction<'_, Sqlite>,
        recipe: &Recipe,
    ) -> Result<(), RecipeError> {
        sqlx::query(UPSERT_SQL)
            .bind(&recipe.title)
            .bind(recipe.key())
            .bind(serde_json::to_string(&recipe.ingredients)?)
            .bind(serde_json::to_string(&recipe.steps)?)
            .bind(serde_json::to_string(&recipe.tags)?)
            .bind(recipe.servings.map(i64::from))
            .bind(&recipe.source_url)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn load_all(&self) -> Result<Vec<Recipe>, RecipeError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!("Loaded {} recipe(s) from SQLite", rows.len());
        rows.into_iter().map(RecipeRow::into_recipe).collect()
    }

    async fn get(&self, title: &str) -> Result<Option<Recipe>, RecipeError> {
        let row: Option<RecipeRow> =
            sqlx::query_as(&format!("{} WHERE title_key = ?", SELECT_COLUMNS))
                .bind(title_key(title))
                .fetch_optional(&self.pool)
                .await?;
        row.map(RecipeRow::into_recipe).transpose()
    }

    async fn count(&self) -> Result<usize, RecipeError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn save_all(&self, recipes: &[Recipe]) -> Result<(), RecipeError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM recipes").execute(&mut *tx).await?;
        for recipe in recipes {
            Self::write_row(&mut tx, recipe).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        if self.get(&recipe.title).await?.is_some() {
            return Err(RecipeError::Duplicate(recipe.title.clone()));
        }
        self.upsert(recipe).await
    }

    async fn upsert(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        let mut tx = self.pool.begin().await?;
        Self::write_row(&mut tx, recipe).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<(), RecipeError> {
        let result = sqlx::query("DELETE FROM recipes WHERE title_key = ?")
            .bind(title_key(title))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RecipeError::NotFound(title.trim().to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_table() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("recipes.db"))
            .await
            .unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%'",
        )
        .fetch_all(&store.pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(names, vec!["recipes"]);
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipes.db");
        let recipe = Recipe::new("Soup").with_ingredients(vec![Ingredient::new("water", "1l")]);

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store.insert(&recipe).await.unwrap();
        }

        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), vec![recipe]);
    }
}
