//! End-to-end tests of the HTTP surface with stubbed generators.

use ai_recipes::generation::{
    BindGenerator, GenerationProvider, GenerationRequest, RequestContext, StructuredGenerator,
};
use ai_recipes::server::{build_app, build_app_from_config};
use ai_recipes::{CakeRecipe, CocktailRecipe, Error, RecipeKind, Result, ServerConfig};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Generator answering per model: `Ok(value)` or a generation error.
#[derive(Default)]
struct Stub {
    answers: HashMap<String, std::result::Result<Value, String>>,
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl Stub {
    fn answer(mut self, model: &str, value: Value) -> Self {
        self.answers.insert(model.to_string(), Ok(value));
        self
    }

    fn fail(mut self, model: &str, message: &str) -> Self {
        self.answers.insert(model.to_string(), Err(message.to_string()));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for Stub {
    async fn generate(&self, model_id: &str, request: &GenerationRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(model_id.to_string());
        self.requests.lock().unwrap().push(request.clone());
        match self.answers.get(model_id) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(Error::generation(message.clone())),
            None => Err(Error::generation(format!("model {} not enabled", model_id))),
        }
    }
}

fn app_with(stub: Arc<Stub>) -> Router {
    build_app(
        CocktailRecipe::default_config().unwrap(),
        CakeRecipe::default_config().unwrap(),
        GenerationProvider::Unbound(stub),
    )
    .unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn cake_set() -> Value {
    json!({
        "recipes": [{
            "name": "Confetti Party Cake",
            "dietary_info": "Contains gluten, dairy, eggs",
            "serving_size": "9-inch round",
            "ingredients": [
                { "item": "flour", "amount": "300 g" },
                { "item": "sprinkles", "amount": "50 g" }
            ],
            "steps": ["Mix", "Bake", "Frost"],
            "decoration": "rainbow sprinkles",
            "flavor_note": "Sweet vanilla with a crunchy finish",
            "estimated_time_min": 90
        }]
    })
}

fn cocktail_set(name: &str) -> Value {
    json!({
        "recipes": [{
            "name": name,
            "alcohol_free": false,
            "glass": "coupe",
            "ingredients": [{ "item": "gin", "amount": "50 ml" }],
            "steps": ["Shake", "Strain"],
            "garnish": "lemon twist",
            "vibe_note": "Crisp",
            "estimated_time_min": 4
        }]
    })
}

#[tokio::test]
async fn test_birthday_cake_returned_verbatim() {
    let stub = Arc::new(Stub::default().answer("gpt-4o-mini", cake_set()));
    let app = app_with(stub.clone());

    let response = app
        .oneshot(post(
            "/api/recipes/cakes",
            r#"{"mood":"birthday","base":"cake"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_json(response).await, cake_set());
    assert_eq!(stub.calls(), vec!["gpt-4o-mini"]);

    let requests = stub.requests.lock().unwrap();
    assert!(requests[0].prompt.starts_with("MOOD: birthday\n"));
    assert!(requests[0].prompt.contains("BASE: cake"));
    assert_eq!(requests[0].schema.name, "cake_recipe_set");
    assert_eq!(requests[0].sampling.temperature, 0.7);
}

#[tokio::test]
async fn test_fallback_returns_second_model_result() {
    let stub = Arc::new(
        Stub::default()
            .fail("gpt-4o-mini", "model not enabled")
            .answer("gpt-4o", cocktail_set("Bee's Knees")),
    );
    let app = app_with(stub.clone());

    let response = app
        .oneshot(post(
            "/api/recipes/cocktails",
            r#"{"mood":"celebratory","base":"gin"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, cocktail_set("Bee's Knees"));
    assert_eq!(stub.calls(), vec!["gpt-4o-mini", "gpt-4o"]);
}

#[tokio::test]
async fn test_undecodable_value_triggers_fallback() {
    let stub = Arc::new(
        Stub::default()
            .answer("gpt-4o-mini", json!({ "recipes": [] }))
            .answer("gpt-4o", cocktail_set("Gimlet")),
    );
    let app = app_with(stub.clone());

    let response = app
        .oneshot(post("/api/recipes/cocktails", r#"{"mood":"sharp"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["recipes"][0]["name"], "Gimlet");
    assert_eq!(stub.calls(), vec!["gpt-4o-mini", "gpt-4o"]);
}

#[tokio::test]
async fn test_exhaustion_is_502_with_last_message() {
    let stub = Arc::new(
        Stub::default()
            .fail("gpt-4o-mini", "first failure")
            .fail("gpt-4o", "second failure"),
    );
    let app = app_with(stub.clone());

    let response = app
        .oneshot(post("/api/recipes/cakes", r#"{"mood":"gloomy","base":"cupcake"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Model did not return valid JSON");
    assert_eq!(body["detail"], "Generation error: second failure");
    assert!(body.get("recipes").is_none());
    assert_eq!(stub.calls(), vec!["gpt-4o-mini", "gpt-4o"]);
}

#[tokio::test]
async fn test_malformed_body_is_500_without_recipes() {
    let stub = Arc::new(Stub::default().answer("gpt-4o-mini", cake_set()));
    let app = app_with(stub.clone());

    let response = app
        .oneshot(post("/api/recipes/cakes", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad request or server error");
    assert!(!body["detail"].as_str().unwrap().is_empty());
    assert!(body.get("recipes").is_none());
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_non_object_body_passes_through_as_empty_request() {
    let stub = Arc::new(Stub::default().answer("gpt-4o-mini", cocktail_set("House Sour")));
    let app = app_with(stub.clone());

    let response = app
        .oneshot(post("/api/recipes/cocktails", "[1, 2, 3]"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let requests = stub.requests.lock().unwrap();
    assert!(requests[0].prompt.starts_with("MOOD: -\n"));
}

#[tokio::test]
async fn test_health() {
    let app = app_with(Arc::new(Stub::default()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

struct AuthEcho {
    seen: Mutex<Vec<Option<String>>>,
}

impl BindGenerator for AuthEcho {
    fn bind(&self, ctx: &RequestContext) -> Result<Arc<dyn StructuredGenerator>> {
        self.seen
            .lock()
            .unwrap()
            .push(ctx.bearer_token().map(String::from));
        Ok(Arc::new(Stub::default().answer("gpt-4o-mini", cocktail_set("Bound"))))
    }
}

#[tokio::test]
async fn test_request_bound_provider_sees_caller_token() {
    let binder = Arc::new(AuthEcho {
        seen: Mutex::new(Vec::new()),
    });
    let app = build_app(
        CocktailRecipe::default_config().unwrap(),
        CakeRecipe::default_config().unwrap(),
        GenerationProvider::RequestBound(binder.clone()),
    )
    .unwrap();

    let mut request = post("/api/recipes/cocktails", r#"{"mood":"x"}"#);
    request
        .headers_mut()
        .insert("authorization", "Bearer caller-token".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *binder.seen.lock().unwrap(),
        vec![Some("caller-token".to_string())]
    );
}

#[tokio::test]
async fn test_bind_failure_is_500() {
    struct Refuses;
    impl BindGenerator for Refuses {
        fn bind(&self, _ctx: &RequestContext) -> Result<Arc<dyn StructuredGenerator>> {
            Err(Error::configuration_with_context(
                "no credentials",
                ai_recipes::ErrorContext::new(),
            ))
        }
    }

    let app = build_app(
        CocktailRecipe::default_config().unwrap(),
        CakeRecipe::default_config().unwrap(),
        GenerationProvider::RequestBound(Arc::new(Refuses)),
    )
    .unwrap();

    let response = app
        .oneshot(post("/api/recipes/cakes", r#"{"mood":"x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["detail"]
        .as_str()
        .unwrap()
        .contains("no credentials"));
}

#[test]
fn test_single_model_list_rejected_at_build() {
    let mut cakes = CakeRecipe::default_config().unwrap();
    cakes.model_ids = vec!["gpt-4o".into()];
    let result = build_app(
        CocktailRecipe::default_config().unwrap(),
        cakes,
        GenerationProvider::Unbound(Arc::new(Stub::default())),
    );
    assert!(result.is_err());
}

#[test]
fn test_colliding_routes_are_an_error_not_a_panic() {
    let mut cakes = CakeRecipe::default_config().unwrap();
    cakes.route = "/api/recipes/cocktails".into();
    let err = build_app(
        CocktailRecipe::default_config().unwrap(),
        cakes,
        GenerationProvider::Unbound(Arc::new(Stub::default())),
    )
    .unwrap_err();
    assert!(err.to_string().contains("domains.cakes.route"));

    let mut cocktails = CocktailRecipe::default_config().unwrap();
    cocktails.route = "/health".into();
    let err = build_app(
        cocktails,
        CakeRecipe::default_config().unwrap(),
        GenerationProvider::Unbound(Arc::new(Stub::default())),
    )
    .unwrap_err();
    assert!(err.to_string().contains("domains.cocktails.route"));
}

#[test]
fn test_colliding_routes_from_config_are_an_error() {
    let config =
        ServerConfig::from_yaml_str("domains:\n  cakes:\n    route: /api/recipes/cocktails\n")
            .unwrap();
    let result = build_app_from_config(&config, GenerationProvider::Unbound(Arc::new(Stub::default())));
    assert!(result.unwrap_err().to_string().contains("domains.cakes.route"));
}
