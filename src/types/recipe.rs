//! Recipe value objects shared by every domain variant.

use crate::domains::DomainConfig;
use crate::structured::schema::{self, SchemaGenerator};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Smallest number of recipes a valid set may hold.
pub const MIN_RECIPES: u64 = 1;
/// Largest number of recipes a valid set may hold.
pub const MAX_RECIPES: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub amount: String,
}

impl Ingredient {
    pub fn new(item: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            amount: amount.into(),
        }
    }

    pub fn schema() -> Value {
        SchemaGenerator::new()
            .add_required("item", schema::string())
            .add_required("amount", schema::string())
            .build()
    }
}

/// A recipe type produced by one domain variant.
///
/// Implementors describe their own closed JSON schema and the default
/// configuration of the endpoint that serves them.
pub trait RecipeKind: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Short domain name used for schema names and log fields.
    const DOMAIN: &'static str;

    /// Schema of a single recipe object.
    fn item_schema() -> Value;

    /// Worked example shown to the model; must satisfy [`Self::item_schema`].
    fn worked_example() -> Self;

    /// Built-in endpoint configuration for this domain.
    fn default_config() -> Result<DomainConfig>;
}

/// The response payload: between [`MIN_RECIPES`] and [`MAX_RECIPES`] recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSet<R> {
    pub recipes: Vec<R>,
}

impl<R: RecipeKind> RecipeSet<R> {
    pub fn new(recipes: Vec<R>) -> Self {
        Self { recipes }
    }

    /// Full output schema sent to the generator.
    pub fn schema() -> Value {
        SchemaGenerator::new()
            .title(format!("{}_recipe_set", R::DOMAIN))
            .add_required(
                "recipes",
                schema::bounded_array(R::item_schema(), MIN_RECIPES, MAX_RECIPES),
            )
            .build()
    }

    /// Decode a schema-conforming value into the typed set.
    ///
    /// Fails when the value does not deserialize or the entry count is out
    /// of bounds, so no set outside the schema is ever constructed.
    pub fn from_value(value: Value) -> Result<Self> {
        let set: Self = serde_json::from_value(value)?;
        let len = set.recipes.len() as u64;
        if !(MIN_RECIPES..=MAX_RECIPES).contains(&len) {
            return Err(Error::validation_with_context(
                format!(
                    "expected {} to {} recipes, got {}",
                    MIN_RECIPES, MAX_RECIPES, len
                ),
                ErrorContext::new()
                    .with_field_path("recipes")
                    .with_source("recipe_set"),
            ));
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Single-entry set wrapping the domain's worked example.
    pub fn example() -> Self {
        Self::new(vec![R::worked_example()])
    }
}
