use clap::Args;
use std::io::{self, BufRead, IsTerminal, Write};

use super::OutputFormat;
use crate::db::RecipeStore;
use crate::error::RecipeError;
use crate::models::{Ingredient, Recipe};
use crate::selection::filter_by_tags;

/// List stored recipes
#[derive(Args)]
pub struct ListCommand {
    /// Only recipes carrying this tag (can be repeated)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ListCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let recipes = filter_by_tags(store.load_all().await?, &self.tags);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
            }
            OutputFormat::Text => {
                if recipes.is_empty() {
                    println!("No recipes found.");
                    return Ok(());
                }
                print!("{}", render_list(&recipes));
            }
        }
        Ok(())
    }
}

fn render_list(recipes: &[Recipe]) -> String {
    let mut out = String::from("Recipes:\n");
    for recipe in recipes {
        if recipe.tags.is_empty() {
            out.push_str(&format!("- {}\n", recipe.title));
        } else {
            out.push_str(&format!("- {} [{}]\n", recipe.title, recipe.tags.join(", ")));
        }
    }
    out.push_str(&format!("\nTotal: {} recipe(s)\n", recipes.len()));
    out
}

/// Add a recipe
#[derive(Args)]
pub struct AddCommand {
    /// Recipe title
    #[arg(long, short)]
    title: Option<String>,

    /// Ingredients as "name:quantity" pairs separated by commas
    #[arg(long, short)]
    ingredients: Option<String>,

    /// Steps separated by commas
    #[arg(long, short)]
    steps: Option<String>,

    /// Tags separated by commas
    #[arg(long, short = 'g')]
    tags: Option<String>,

    /// Number of servings
    #[arg(long)]
    servings: Option<u32>,

    /// Where the recipe came from
    #[arg(long)]
    source_url: Option<String>,
}

impl AddCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let title = required(&self.title, "title", "Title")?;
        let ingredients = required(
            &self.ingredients,
            "ingredients",
            "Ingredients (name:qty, comma-separated)",
        )?;
        let steps = required(&self.steps, "steps", "Steps (comma-separated)")?;

        let recipe = build_recipe(
            &title,
            &ingredients,
            &steps,
            self.tags.as_deref().unwrap_or(""),
            self.servings,
            self.source_url.clone(),
        )?;

        store.insert(&recipe).await?;
        println!("Recipe \"{}\" added.\n", recipe.title);
        print!("{}", recipe);
        Ok(())
    }
}

/// Use the flag value, or ask for it when a person is at the keyboard.
fn required(
    value: &Option<String>,
    field: &str,
    prompt: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(value) = value {
        return Ok(value.clone());
    }
    if !io::stdin().is_terminal() {
        return Err(RecipeError::Validation(format!("{} is required", field)).into());
    }

    print!("{}: ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Build a normalized, validated recipe from the comma-separated forms
/// `add` accepts.
fn build_recipe(
    title: &str,
    ingredients: &str,
    steps: &str,
    tags: &str,
    servings: Option<u32>,
    source_url: Option<String>,
) -> Result<Recipe, RecipeError> {
    let mut recipe = Recipe::new(title)
        .with_ingredients(Ingredient::parse_list(ingredients))
        .with_steps(steps.split(','))
        .with_tags(tags.split(','));
    if let Some(servings) = servings {
        recipe = recipe.with_servings(servings);
    }
    if let Some(url) = source_url {
        recipe = recipe.with_source_url(url);
    }
    recipe.into_valid()
}

/// Delete a recipe by title
#[derive(Args)]
pub struct DeleteCommand {
    /// Title of the recipe to delete (case-insensitive)
    #[arg(long, short)]
    title: String,

    /// Skip confirmation prompt
    #[arg(long, short)]
    force: bool,
}

impl DeleteCommand {
    pub async fn run(&self, store: &dyn RecipeStore) -> Result<(), Box<dyn std::error::Error>> {
        let recipe = store
            .get(&self.title)
            .await?
            .ok_or_else(|| RecipeError::NotFound(self.title.trim().to_string()))?;

        // Confirm deletion unless --force is used
        if !self.force
            && !confirm_delete(&recipe.title, io::stdin().is_terminal(), &mut io::stdin().lock())?
        {
            println!("Deletion cancelled.");
            return Ok(());
        }

        store.delete(&recipe.title).await?;
        println!("Recipe \"{}\" deleted.", recipe.title);
        Ok(())
    }
}

/// Ask whether to delete `title`. Without a terminal there is nobody to
/// answer, so the caller has to pass `--force` instead.
fn confirm_delete(
    title: &str,
    interactive: bool,
    input: &mut impl BufRead,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !interactive {
        return Err(format!(
            "Cannot confirm deletion of '{}': stdin is not a terminal. Use --force to delete without confirmation.",
            title
        )
        .into());
    }

    print!("Delete recipe '{}'? [y/N] ", title);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
