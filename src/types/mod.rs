//! Request and recipe data model.

pub mod recipe;
pub mod request;

pub use recipe::{Ingredient, RecipeKind, RecipeSet, MAX_RECIPES, MIN_RECIPES};
pub use request::RecipeRequest;
