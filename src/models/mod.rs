mod ingredient;
mod recipe;
mod recipe_ingredient;

use crate::database::Metadata;

pub use ingredient::{INGREDIENTS, IngredientRecord, NewIngredient};
pub use recipe::{RECIPES, RecipeRecord};
pub use recipe_ingredient::{RECIPE_INGREDIENTS, RecipeIngredientRecord};

/// Every table the application declares, in dependency order.
pub fn metadata() -> Metadata {
    Metadata::new()
        .with_table(INGREDIENTS)
        .with_table(RECIPES)
        .with_table(RECIPE_INGREDIENTS)
}
