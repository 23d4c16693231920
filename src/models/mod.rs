mod ingredient;
mod quantity;
mod recipe;

pub use ingredient::Ingredient;
pub use quantity::{format_measure, Quantity};
pub use recipe::{title_key, Recipe};
