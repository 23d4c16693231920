use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::Ingredient;
use crate::error::RecipeError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "ingredient_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "servings_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            tags: Vec::new(),
            servings: None,
            source_url: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps<S: Into<String>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Trim every text field, drop blank steps and tags, dedupe tags.
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();

        for ingredient in &mut self.ingredients {
            ingredient.name = ingredient.name.trim().to_string();
            ingredient.quantity = ingredient.quantity.trim().to_string();
        }

        self.steps = self
            .steps
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        self.tags = tags;

        self.source_url = self
            .source_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        self
    }

    /// Check the fields every stored recipe must have. Call after `normalize`.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.title.is_empty() {
            return Err(RecipeError::Validation("title is required".into()));
        }
        if self.ingredients.is_empty() {
            return Err(RecipeError::Validation(format!(
                "'{}' has no ingredients",
                self.title
            )));
        }
        if let Some(pos) = self.ingredients.iter().position(|i| i.name.is_empty()) {
            return Err(RecipeError::Validation(format!(
                "'{}' has an unnamed ingredient at position {}",
                self.title,
                pos + 1
            )));
        }
        if self.servings == Some(0) {
            return Err(RecipeError::Validation(format!(
                "'{}' must serve at least one",
                self.title
            )));
        }
        Ok(())
    }

    /// Normalize, then validate.
    pub fn into_valid(self) -> Result<Self, RecipeError> {
        let recipe = self.normalize();
        recipe.validate()?;
        Ok(recipe)
    }

    /// True when the recipe carries every one of `tags`.
    pub fn has_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|wanted| self.tags.iter().any(|t| t == wanted))
    }

    pub fn key(&self) -> String {
        title_key(&self.title)
    }
}

/// Titles are unique regardless of case and surrounding whitespace.
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;

        if let Some(servings) = self.servings {
            writeln!(f, "Servings: {}", servings)?;
        }

        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }

        if let Some(url) = &self.source_url {
            writeln!(f, "Source: {}", url)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "- {}", ingredient)?;
            }
        }

        if !self.steps.is_empty() {
            writeln!(f, "\nSteps:")?;
            for (i, step) in self.steps.iter().enumerate() {
                writeln!(f, "{}. {}", i + 1, step)?;
            }
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsField {
    List(Vec<Ingredient>),
    Map(serde_json::Map<String, serde_json::Value>),
}

/// Accept both `[{"name", "quantity"}]` and the older `{"name": "quantity"}` shape.
fn ingredient_list<'de, D>(deserializer: D) -> Result<Vec<Ingredient>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IngredientsField>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(IngredientsField::List(list)) => Ok(list),
        Some(IngredientsField::Map(map)) => Ok(map
            .into_iter()
            .map(|(name, value)| {
                let quantity = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                Ingredient::new(name, quantity)
            })
            .collect()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ServingsField {
    Count(u32),
    Text(String),
}

/// Servings were stored as text by the SQLite backend of older versions.
fn servings_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ServingsField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ServingsField::Count(n)) => Ok(Some(n)),
        Some(ServingsField::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(ServingsField::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid servings '{}'", s))),
    }
}
