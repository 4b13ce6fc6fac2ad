//! Cake and cupcake recipes.

use super::DomainConfig;
use crate::generation::SamplingParams;
use crate::structured::schema::{self, SchemaGenerator};
use crate::types::{Ingredient, RecipeKind};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ROUTE: &str = "/api/recipes/cakes";

const MIN_TIME_MIN: i64 = 15;
const MAX_TIME_MIN: i64 = 240;
const DEFAULT_TIME_MIN: u32 = 60;

const PERSONA: &str = "You are “AI Baker,” a precise, allergy-aware pastry chef.";

const RULES: &[&str] = &[
    "Return ONLY valid JSON matching the schema. No markdown, no prose. Return exactly 3 recipes.",
    "Keep each recipe under ~150 words.",
    "If BASE=cupcake, use a cupcake serving_size (6 cupcakes, 12 cupcakes, 24 cupcakes, or 12 mini cupcakes); otherwise use a cake serving_size.",
    "State allergens and dietary notes in dietary_info; if the user implies a dietary need, honor it.",
    "Prefer AVAILABLE_INGREDIENTS when possible.",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServingSize {
    #[serde(rename = "6-inch round")]
    SixInchRound,
    #[default]
    #[serde(rename = "8-inch round")]
    EightInchRound,
    #[serde(rename = "9-inch round")]
    NineInchRound,
    #[serde(rename = "two-tier")]
    TwoTier,
    #[serde(rename = "sheet cake")]
    SheetCake,
    #[serde(rename = "bundt")]
    Bundt,
    #[serde(rename = "6 cupcakes")]
    SixCupcakes,
    #[serde(rename = "12 cupcakes")]
    TwelveCupcakes,
    #[serde(rename = "24 cupcakes")]
    TwentyFourCupcakes,
    #[serde(rename = "12 mini cupcakes")]
    TwelveMiniCupcakes,
}

impl ServingSize {
    pub const ALL: [ServingSize; 10] = [
        ServingSize::SixInchRound,
        ServingSize::EightInchRound,
        ServingSize::NineInchRound,
        ServingSize::TwoTier,
        ServingSize::SheetCake,
        ServingSize::Bundt,
        ServingSize::SixCupcakes,
        ServingSize::TwelveCupcakes,
        ServingSize::TwentyFourCupcakes,
        ServingSize::TwelveMiniCupcakes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServingSize::SixInchRound => "6-inch round",
            ServingSize::EightInchRound => "8-inch round",
            ServingSize::NineInchRound => "9-inch round",
            ServingSize::TwoTier => "two-tier",
            ServingSize::SheetCake => "sheet cake",
            ServingSize::Bundt => "bundt",
            ServingSize::SixCupcakes => "6 cupcakes",
            ServingSize::TwelveCupcakes => "12 cupcakes",
            ServingSize::TwentyFourCupcakes => "24 cupcakes",
            ServingSize::TwelveMiniCupcakes => "12 mini cupcakes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakeRecipe {
    pub name: String,
    pub dietary_info: String,
    #[serde(default)]
    pub serving_size: ServingSize,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub decoration: String,
    #[serde(default)]
    pub flavor_note: String,
    #[serde(default = "default_time")]
    pub estimated_time_min: u32,
}

fn default_time() -> u32 {
    DEFAULT_TIME_MIN
}

impl RecipeKind for CakeRecipe {
    const DOMAIN: &'static str = "cake";

    fn item_schema() -> Value {
        let sizes: Vec<&str> = ServingSize::ALL.iter().map(ServingSize::as_str).collect();
        SchemaGenerator::new()
            .add_required("name", schema::string())
            .add_required("dietary_info", schema::string())
            .add_property(
                "serving_size",
                schema::string_enum(&sizes, ServingSize::default().as_str()),
            )
            .add_property("ingredients", schema::array_with_default(Ingredient::schema()))
            .add_property("steps", schema::array_with_default(schema::string()))
            .add_property("decoration", schema::string_with_default(""))
            .add_property("flavor_note", schema::string_with_default(""))
            .add_property(
                "estimated_time_min",
                schema::bounded_integer(MIN_TIME_MIN, MAX_TIME_MIN, DEFAULT_TIME_MIN as i64),
            )
            .build()
    }

    fn worked_example() -> Self {
        Self {
            name: "Lemon Cloud Cake".into(),
            dietary_info: "Contains gluten, dairy, eggs".into(),
            serving_size: ServingSize::EightInchRound,
            ingredients: vec![
                Ingredient::new("flour", "250 g"),
                Ingredient::new("sugar", "200 g"),
                Ingredient::new("butter", "115 g"),
                Ingredient::new("eggs", "3"),
                Ingredient::new("lemon zest", "2 tbsp"),
            ],
            steps: vec![
                "Cream butter and sugar".into(),
                "Beat in eggs and zest".into(),
                "Fold in flour".into(),
                "Bake at 175°C for 35 min".into(),
            ],
            decoration: "lemon glaze and candied peel".into(),
            flavor_note: "Bright, tangy, and tender".into(),
            estimated_time_min: 75,
        }
    }

    fn default_config() -> Result<DomainConfig> {
        DomainConfig::for_kind::<Self>(
            ROUTE,
            PERSONA,
            RULES,
            SamplingParams {
                temperature: 0.7,
                max_output_tokens: 1000,
            },
        )
    }
}
