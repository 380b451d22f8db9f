mod ingredient_controller;

pub use ingredient_controller::{create_ingredient, get_all_ingredients, get_ingredient};
