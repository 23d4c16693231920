//! Create the recipe store and load the sample recipes.

use clap::Args;

use crate::db::RecipeStore;
use crate::error::RecipeError;
use crate::models::{Ingredient, Recipe};

/// Create the store and refresh the sample recipes
#[derive(Args)]
pub struct InitCommand {
    /// Empty the store before loading the samples
    #[arg(long, short)]
    force: bool,
}

impl InitCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        if self.force {
            println!("Dropped existing recipes.");
        }
        let total = seed(store, self.force).await?;
        println!("Initialized recipe store with sample recipes ({} total).", total);
        Ok(())
    }
}

/// Load the sample recipes, replacing any stored recipe with the same
/// title. Returns the number of recipes in the store afterwards.
pub(crate) async fn seed(store: &dyn RecipeStore, force: bool) -> Result<usize, RecipeError> {
    if force {
        store.save_all(&[]).await?;
    }
    for recipe in sample_recipes() {
        store.upsert(&recipe).await?;
    }
    store.count().await
}

fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Spaghetti Aglio e Olio")
            .with_ingredients(vec![
                Ingredient::new("spaghetti", "200g"),
                Ingredient::new("garlic", "3 cloves"),
                Ingredient::new("olive oil", "2 tbsp"),
                Ingredient::new("chili flakes", "1 tsp"),
            ])
            .with_steps(["Boil pasta", "Saute garlic", "Toss together"])
            .with_tags(["italian", "vegetarian"]),
        Recipe::new("Quick Pancakes")
            .with_ingredients(vec![
                Ingredient::new("flour", "200g"),
                Ingredient::new("milk", "250ml"),
                Ingredient::new("egg", "1"),
                Ingredient::new("baking powder", "1 tsp"),
                Ingredient::new("sugar", "2 tbsp"),
            ])
            .with_steps(["Mix ingredients", "Cook on griddle"])
            .with_tags(["breakfast", "vegetarian"]),
        Recipe::new("Chicken Salad")
            .with_ingredients(vec![
                Ingredient::new("chicken breast", "200g"),
                Ingredient::new("lettuce", "1 head"),
                Ingredient::new("tomato", "2"),
                Ingredient::new("cucumber", "1"),
                Ingredient::new("olive oil", "1 tbsp"),
            ])
            .with_steps(["Cook chicken", "Chop veggies", "Toss together", "Dress salad"])
            .with_tags(["lunch", "gluten-free"]),
    ]
}
