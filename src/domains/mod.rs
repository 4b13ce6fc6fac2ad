//! 领域变体：鸡尾酒与蛋糕
//!
//! Domain variants. Each variant is one configuration record for the shared
//! recipe handler: route, output schema, prompt template, sampling and model
//! list. Nothing else differs between them.

pub mod cake;
pub mod cocktail;

use crate::config::DomainSettings;
use crate::generation::{GenerationRequest, OutputSchema, SamplingParams};
use crate::prompt::{PromptTemplate, SystemTemplate, UserTemplate};
use crate::structured::preflight;
use crate::types::{RecipeKind, RecipeRequest, RecipeSet};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;

pub use cake::{CakeRecipe, ServingSize};
pub use cocktail::{CocktailRecipe, Glass};

/// Models tried in order when a domain does not configure its own.
pub const DEFAULT_MODELS: [&str; 2] = ["gpt-4o-mini", "gpt-4o"];

/// Everything the generic handler needs to serve one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainConfig {
    /// Short name, used in logs.
    pub name: &'static str,
    pub route: String,
    pub output: OutputSchema,
    pub prompt: PromptTemplate,
    pub sampling: SamplingParams,
    pub model_ids: Vec<String>,
}

impl DomainConfig {
    /// Assemble a config for `R` from its schema and worked example.
    pub fn for_kind<R: RecipeKind>(
        route: &str,
        persona: &str,
        rules: &[&str],
        sampling: SamplingParams,
    ) -> Result<Self> {
        let example = serde_json::to_string_pretty(&RecipeSet::<R>::example())?;
        Ok(Self {
            name: R::DOMAIN,
            route: route.to_string(),
            output: OutputSchema {
                name: format!("{}_recipe_set", R::DOMAIN),
                schema: RecipeSet::<R>::schema(),
            },
            prompt: PromptTemplate {
                system: SystemTemplate {
                    persona: persona.to_string(),
                    rules: rules.iter().map(|r| r.to_string()).collect(),
                    example,
                },
                user: UserTemplate::standard(),
            },
            sampling,
            model_ids: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        })
    }

    /// Apply configured overrides; absent settings keep the built-in values.
    ///
    /// Routes are not checked here; see [`crate::config::check_routes`].
    pub fn with_overrides(mut self, settings: Option<&DomainSettings>) -> Self {
        let Some(settings) = settings else {
            return self;
        };

        if let Some(route) = &settings.route {
            self.route = route.clone();
        }
        if let Some(models) = &settings.models {
            self.model_ids = models.clone();
        }
        if let Some(temperature) = settings.temperature {
            self.sampling.temperature = temperature;
        }
        if let Some(max_output_tokens) = settings.max_output_tokens {
            self.sampling.max_output_tokens = max_output_tokens;
        }
        self
    }

    /// Compile the output schema and check the prompt's worked example
    /// against it.
    pub fn preflight(&self) -> Result<()> {
        let example: Value = serde_json::from_str(&self.prompt.system.example).map_err(|e| {
            Error::configuration_with_context(
                format!("worked example is not JSON: {}", e),
                ErrorContext::new()
                    .with_field_path(&self.output.name)
                    .with_source("schema_preflight"),
            )
        })?;
        preflight(&self.output.name, &self.output.schema, &example)
    }

    /// Render prompts for one inbound request.
    pub fn generation_request(&self, request: &RecipeRequest) -> GenerationRequest {
        let rendered = self.prompt.render(request);
        GenerationRequest {
            system: rendered.system,
            prompt: rendered.user,
            schema: self.output.clone(),
            sampling: self.sampling,
        }
    }
}
