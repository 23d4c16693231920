use clap::Args;
use std::fmt;

use crate::db::RecipeStore;
use crate::models::Recipe;
use crate::selection::{filter_by_tags, pick_random};

/// Pick random recipes
#[derive(Args)]
pub struct RandomCommand {
    /// Only pick recipes carrying this tag (can be repeated)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// How many recipes to pick
    #[arg(
        long,
        short = 'n',
        default_value_t = 1,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    count: usize,
}

impl RandomCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let pool = filter_by_tags(store.load_all().await?, &self.tags);
        let picks = pick_random(&pool, self.count, &mut rand::rng());
        tracing::debug!("Picked {} of {} matching recipe(s)", picks.len(), pool.len());

        if picks.is_empty() {
            println!("No recipes found.");
            return Ok(());
        }
        for recipe in &picks {
            print!("{}", Pick(recipe));
        }
        Ok(())
    }
}

/// A picked recipe as `random` prints it.
struct Pick<'a>(&'a Recipe);

impl fmt::Display for Pick<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = self.0;
        writeln!(f, "\nTitle: {}", recipe.title)?;
        writeln!(f, "Ingredients:")?;
        for ingredient in &recipe.ingredients {
            writeln!(f, "- {}", ingredient)?;
        }
        writeln!(f, "Steps:")?;
        for (i, step) in recipe.steps.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, step)?;
        }
        Ok(())
    }
}
