//! The caller's free-text preferences for one generation request.

use serde::{Deserialize, Serialize};

/// One inbound request's preferences. Every field is optional: the input
/// reader performs no validation, and the model is the gate on quality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub mood: Option<String>,
    pub occasion: Option<String>,
    pub style: Option<String>,
    /// Selects the sub-domain variant, e.g. `mocktail` or `cupcake`.
    pub base: Option<String>,
    /// Comma-separated ingredient hints, passed through verbatim.
    #[serde(rename = "ingredientsCSV")]
    pub ingredients_csv: Option<String>,
}

impl RecipeRequest {
    pub fn new(mood: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            mood: Some(mood.into()),
            base: Some(base.into()),
            ..Self::default()
        }
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = Some(occasion.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_ingredients(mut self, csv: impl Into<String>) -> Self {
        self.ingredients_csv = Some(csv.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let req = RecipeRequest::new("birthday", "cake").with_ingredients("flour, eggs");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["ingredientsCSV"], "flour, eggs");
        assert!(value.get("ingredients_csv").is_none());
    }
}
