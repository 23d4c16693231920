//! Denormalized single-file export for static publishing.

use serde::Serialize;

use crate::error::RecipeError;
use crate::models::Recipe;

#[derive(Serialize)]
struct PublishedIngredient<'a> {
    name: &'a str,
    amount: &'a str,
}

#[derive(Serialize)]
struct PublishedRecipe<'a> {
    title: &'a str,
    tags: &'a [String],
    ingredients: Vec<PublishedIngredient<'a>>,
    steps: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<&'a str>,
}

impl<'a> From<&'a Recipe> for PublishedRecipe<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            title: &recipe.title,
            tags: &recipe.tags,
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| PublishedIngredient {
                    name: &i.name,
                    amount: &i.quantity,
                })
                .collect(),
            steps: &recipe.steps,
            servings: recipe.servings,
            source_url: recipe.source_url.as_deref(),
        }
    }
}

/// `[{title, tags, ingredients: [{name, amount}], steps, servings?, source_url?}]`
/// as compact JSON.
pub fn to_snapshot(recipes: &[Recipe]) -> Result<String, RecipeError> {
    let published: Vec<PublishedRecipe> = recipes.iter().map(PublishedRecipe::from).collect();
    Ok(serde_json::to_string(&published)?)
}
