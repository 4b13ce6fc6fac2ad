//! Cocktail and mocktail recipes.

use super::DomainConfig;
use crate::generation::SamplingParams;
use crate::structured::schema::{self, SchemaGenerator};
use crate::types::{Ingredient, RecipeKind};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ROUTE: &str = "/api/recipes/cocktails";

const MIN_TIME_MIN: i64 = 1;
const MAX_TIME_MIN: i64 = 10;
const DEFAULT_TIME_MIN: u32 = 3;

const PERSONA: &str = "You are “AI Bartender,” a concise, safety-conscious mixologist.";

const RULES: &[&str] = &[
    "Return ONLY valid JSON matching the schema. No markdown, no prose. Return exactly 3 recipes.",
    "Keep each recipe under ~120 words.",
    "If BASE=mocktail or user implies no alcohol, set alcohol_free=true and avoid spirits.",
    "Prefer AVAILABLE_INGREDIENTS when possible.",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Glass {
    #[default]
    Rocks,
    Highball,
    Coupe,
    Martini,
    Collins,
    Mug,
    Wine,
}

impl Glass {
    pub const ALL: [Glass; 7] = [
        Glass::Rocks,
        Glass::Highball,
        Glass::Coupe,
        Glass::Martini,
        Glass::Collins,
        Glass::Mug,
        Glass::Wine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Glass::Rocks => "rocks",
            Glass::Highball => "highball",
            Glass::Coupe => "coupe",
            Glass::Martini => "martini",
            Glass::Collins => "collins",
            Glass::Mug => "mug",
            Glass::Wine => "wine",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailRecipe {
    pub name: String,
    pub alcohol_free: bool,
    #[serde(default)]
    pub glass: Glass,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub garnish: String,
    #[serde(default)]
    pub vibe_note: String,
    #[serde(default = "default_time")]
    pub estimated_time_min: u32,
}

fn default_time() -> u32 {
    DEFAULT_TIME_MIN
}

impl RecipeKind for CocktailRecipe {
    const DOMAIN: &'static str = "cocktail";

    fn item_schema() -> Value {
        let glasses: Vec<&str> = Glass::ALL.iter().map(Glass::as_str).collect();
        SchemaGenerator::new()
            .add_required("name", schema::string())
            .add_required("alcohol_free", schema::boolean())
            .add_property("glass", schema::string_enum(&glasses, Glass::default().as_str()))
            .add_property("ingredients", schema::array_with_default(Ingredient::schema()))
            .add_property("steps", schema::array_with_default(schema::string()))
            .add_property("garnish", schema::string_with_default(""))
            .add_property("vibe_note", schema::string_with_default(""))
            .add_property(
                "estimated_time_min",
                schema::bounded_integer(MIN_TIME_MIN, MAX_TIME_MIN, DEFAULT_TIME_MIN as i64),
            )
            .build()
    }

    fn worked_example() -> Self {
        Self {
            name: "Citrus Breeze".into(),
            alcohol_free: true,
            glass: Glass::Highball,
            ingredients: vec![
                Ingredient::new("lime juice", "20 ml"),
                Ingredient::new("ginger syrup", "10 ml"),
                Ingredient::new("soda water", "100 ml"),
            ],
            steps: vec![
                "Build over ice".into(),
                "Top with soda".into(),
                "Stir gently".into(),
            ],
            garnish: "mint sprig".into(),
            vibe_note: "Light, zesty, and refreshing".into(),
            estimated_time_min: 3,
        }
    }

    fn default_config() -> Result<DomainConfig> {
        DomainConfig::for_kind::<Self>(
            ROUTE,
            PERSONA,
            RULES,
            SamplingParams {
                temperature: 0.6,
                max_output_tokens: 800,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::OutputValidator;
    use crate::types::RecipeSet;
    use serde_json::json;

    #[test]
    fn test_glass_wire_names() {
        for glass in Glass::ALL {
            assert_eq!(serde_json::to_value(glass).unwrap(), json!(glass.as_str()));
        }
    }

    #[test]
    fn test_missing_optionals_get_defaults() {
        let validator = OutputValidator::strict(RecipeSet::<CocktailRecipe>::schema());
        let value = validator
            .validate_or_fail(&json!({
                "recipes": [{ "name": "Old Fashioned", "alcohol_free": false }]
            }))
            .unwrap();

        let set = RecipeSet::<CocktailRecipe>::from_value(value).unwrap();
        let recipe = &set.recipes[0];
        assert_eq!(recipe.glass, Glass::Rocks);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
        assert_eq!(recipe.garnish, "");
        assert_eq!(recipe.vibe_note, "");
        assert_eq!(recipe.estimated_time_min, 3);
    }

    #[test]
    fn test_schema_rejects_out_of_range_values() {
        let validator = OutputValidator::strict(RecipeSet::<CocktailRecipe>::schema());
        let result = validator.validate(&json!({
            "recipes": [{
                "name": "Tall Order",
                "alcohol_free": false,
                "glass": "tiki",
                "estimated_time_min": 45
            }]
        }));
        assert!(!result.is_valid());
        let messages = result.error_messages().join("\n");
        assert!(messages.contains("recipes[0].glass"));
        assert!(messages.contains("recipes[0].estimated_time_min"));
    }

    #[test]
    fn test_schema_requires_alcohol_free() {
        let validator = OutputValidator::strict(RecipeSet::<CocktailRecipe>::schema());
        let result = validator.validate(&json!({ "recipes": [{ "name": "Mystery" }] }));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_system_prompt_matches_house_style() {
        let config = CocktailRecipe::default_config().unwrap();
        let system = config.prompt.system.render();
        assert!(system.starts_with(
            "You are “AI Bartender,” a concise, safety-conscious mixologist. \
             Return ONLY valid JSON matching the schema."
        ));
        assert!(system.contains("set alcohol_free=true and avoid spirits."));
        assert!(system.contains("Example JSON: {"));
        assert!(system.contains("\"Citrus Breeze\""));
        assert_eq!(config.model_ids, vec!["gpt-4o-mini", "gpt-4o"]);
    }

    #[test]
    fn test_worked_example_keeps_field_order() {
        let system = CocktailRecipe::default_config().unwrap().prompt.system.render();
        let (_, example) = system.split_once("Example JSON: ").unwrap();
        assert!(example.starts_with(
            "{\n  \"recipes\": [\n    {\n      \"name\": \"Citrus Breeze\",\n      \"alcohol_free\": true,\n      \"glass\": \"highball\","
        ));
        let vibe = example.find("\"vibe_note\"").unwrap();
        let time = example.find("\"estimated_time_min\"").unwrap();
        assert!(example.find("\"steps\"").unwrap() < vibe && vibe < time);
    }
}
