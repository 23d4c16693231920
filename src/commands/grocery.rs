//! Combined shopping list for a set of recipes.

use clap::Args;
use rand::Rng;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;
use crate::db::RecipeStore;
use crate::error::RecipeError;
use crate::grocery::GroceryList;
use crate::models::{title_key, Recipe};
use crate::selection::{filter_by_tags, pick_random};

/// Build a grocery list from stored recipes
#[derive(Args)]
pub struct GroceryCommand {
    /// Use this many randomly chosen recipes instead of all of them
    #[arg(
        long,
        short = 'n',
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    count: Option<usize>,

    /// Only recipes carrying this tag (can be repeated)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Use exactly these recipes (can be repeated)
    #[arg(long = "title", short, value_name = "TITLE", conflicts_with_all = ["count", "tags"])]
    titles: Vec<String>,

    /// Output file (defaults to the configured grocery file)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl GroceryCommand {
    pub async fn run(
        &self,
        store: &dyn RecipeStore,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let recipes = select_recipes(
            store.load_all().await?,
            &self.titles,
            &self.tags,
            self.count,
            &mut rand::rng(),
        )?;
        let list = GroceryList::aggregate(&recipes);
        tracing::debug!(
            "Aggregated {} ingredient(s) from {} recipe(s)",
            list.len(),
            recipes.len()
        );

        let output = match self.format {
            OutputFormat::Text => list.to_string(),
            OutputFormat::Json => format!("{}\n", list.to_json()?),
        };

        let file = self.file.as_ref().unwrap_or(&config.grocery_file.value);
        std::fs::write(file, &output).map_err(|e| RecipeError::io(file, e))?;

        print!("{}", output);
        println!("Grocery list written to {}", file.display());
        Ok(())
    }
}

/// Recipes to shop for: the named ones if any titles are given, otherwise
/// the tag matches, sampled down to `count` when set.
fn select_recipes<R: Rng + ?Sized>(
    recipes: Vec<Recipe>,
    titles: &[String],
    tags: &[String],
    count: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Recipe>, RecipeError> {
    if !titles.is_empty() {
        return titles
            .iter()
            .map(|title| {
                let key = title_key(title);
                recipes
                    .iter()
                    .find(|r| r.key() == key)
                    .cloned()
                    .ok_or_else(|| RecipeError::NotFound(title.trim().to_string()))
            })
            .collect();
    }

    let pool = filter_by_tags(recipes, tags);
    Ok(match count {
        Some(count) => pick_random(&pool, count, rng),
        None => pool,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn recipes() -> Vec<Recipe> {
        vec![
            Recipe::new("Quick Pancakes")
                .with_ingredients(vec![Ingredient::new("flour", "200g")])
                .with_tags(["breakfast"]),
            Recipe::new("Bread")
                .with_ingredients(vec![Ingredient::new("flour", "500g")])
                .with_tags(["baking"]),
            Recipe::new("Porridge")
                .with_ingredients(vec![Ingredient::new("oats", "80g")])
                .with_tags(["breakfast"]),
        ]
    }

    fn titles(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_select_all_by_default() {
        let mut rng = StdRng::seed_from_u64(1);
        let selected = select_recipes(recipes(), &[], &[], None, &mut rng).unwrap();
        assert_eq!(selected.len(), 3);

        let list = GroceryList::aggregate(&selected);
        assert_eq!(list.to_string(), "flour - 700g\noats - 80g\n");
    }

    #[test]
    fn test_select_by_title() {
        let mut rng = StdRng::seed_from_u64(1);
        let wanted = vec!["porridge".to_string(), "Bread".to_string()];
        let selected = select_recipes(recipes(), &wanted, &[], None, &mut rng).unwrap();
        assert_eq!(titles(&selected), vec!["Porridge", "Bread"]);
    }

    #[test]
    fn test_select_unknown_title_is_not_found() {
        let mut rng = StdRng::seed_from_u64(1);
        let wanted = vec!["Lasagne".to_string()];
        let err = select_recipes(recipes(), &wanted, &[], None, &mut rng).unwrap_err();
        assert!(matches!(err, RecipeError::NotFound(t) if t == "Lasagne"));
    }

    #[test]
    fn test_select_by_tag_and_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let tags = vec!["breakfast".to_string()];

        let selected = select_recipes(recipes(), &[], &tags, None, &mut rng).unwrap();
        assert_eq!(titles(&selected), vec!["Quick Pancakes", "Porridge"]);

        let selected = select_recipes(recipes(), &[], &tags, Some(1), &mut rng).unwrap();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].tags.contains(&"breakfast".to_string()));

        let selected = select_recipes(recipes(), &[], &tags, Some(10), &mut rng).unwrap();
        assert_eq!(selected.len(), 2);
    }
}
