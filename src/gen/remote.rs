//! Remote AI level providers
//!
//! Two HTTP-backed providers share one response contract: the model is asked
//! for a JSON object with `layout`, `obstacles`, `items`, `startPosition`
//! and `endPosition`. Responses arrive as free text and may wrap the JSON in
//! a fenced code block, so extraction is tolerant. Anything missing is filled
//! with deterministic defaults before validation; validation itself happens
//! in the pipeline.

use serde::Deserialize;
use serde_json::Value;

use futures_util::future::BoxFuture;

use crate::core::level::{
    derive_level_id, ItemSpec, Layout, LevelSpec, ObstacleSpec, Position,
};

use super::{pipeline::now_ms, GenerateError, GenerateRequest, Generator};

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
const OPENROUTER_ENDPOINT: &str = "https://api.openrouter.ai/api/v1/chat/completions";
const OPENROUTER_MODEL: &str = "anthropic/claude-3-opus:beta";

fn design_prompt(request: &GenerateRequest) -> String {
    format!(
        "You are a puzzle game level designer. Respond with a single JSON object: \
         {{\"layout\": number[][] (0 = empty, 1 = wall, square grid), \
         \"obstacles\": [{{\"x\": int, \"y\": int, \"type\": string}}], \
         \"items\": [{{\"x\": int, \"y\": int, \"type\": string}}], \
         \"startPosition\": {{\"x\": int, \"y\": int}}, \
         \"endPosition\": {{\"x\": int, \"y\": int}}}}. \
         Create a {} themed puzzle level with difficulty {}/10. \
         The level should be challenging but solvable.",
        request.theme, request.player_skill
    )
}

/// Strip an optional markdown code fence and return the JSON payload text
fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();
    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }
    trimmed
}

/// Partial level shape as the models emit it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelLevel {
    layout: Option<Layout>,
    #[serde(default)]
    obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    items: Vec<ItemSpec>,
    start_position: Option<Position>,
    end_position: Option<Position>,
}

/// Assemble a full `LevelSpec` from model output, defaulting omitted fields
fn assemble_level(text: &str, request: &GenerateRequest) -> Result<LevelSpec, GenerateError> {
    let body = extract_json_block(text);
    let model: ModelLevel = serde_json::from_str(body)
        .map_err(|e| GenerateError::Malformed(format!("level json: {e}")))?;

    let layout = model
        .layout
        .ok_or_else(|| GenerateError::Malformed("response has no layout".to_string()))?;
    let grid = layout.to_grid()?;
    let edge = grid.size() as i32 - 1;

    Ok(LevelSpec {
        level_id: derive_level_id(&request.theme, now_ms()),
        layout,
        obstacles: model.obstacles,
        items: model.items,
        start_position: model.start_position.unwrap_or(Position::new(0, 0)),
        end_position: model.end_position.unwrap_or(Position::new(edge, edge)),
        difficulty_rating: request.player_skill,
        theme: request.theme.clone(),
    })
}

/// Gemini-style provider: key-in-query-string API
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: read_env("GEMINI_API_KEY"),
        }
    }

    async fn call(&self, request: &GenerateRequest) -> Result<LevelSpec, GenerateError> {
        let key = self.api_key.as_deref().ok_or(GenerateError::NotConfigured)?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": design_prompt(request) }] }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 2048,
                "responseMimeType": "application/json",
            }
        });

        let response: Value = self
            .client
            .post(format!("{GEMINI_ENDPOINT}?key={key}"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                GenerateError::Malformed("no text candidate in response".to_string())
            })?;

        assemble_level(text, request)
    }
}

impl Generator for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate_level<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<LevelSpec, GenerateError>> {
        Box::pin(self.call(request))
    }
}

/// OpenRouter-style provider: chat-completions API with bearer token + key
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    api_token: Option<String>,
}

impl OpenRouterProvider {
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: read_env("OPENROUTER_API_KEY"),
            api_token: read_env("OPENROUTER_API_TOKEN"),
        }
    }

    async fn call(&self, request: &GenerateRequest) -> Result<LevelSpec, GenerateError> {
        let (key, token) = match (&self.api_key, &self.api_token) {
            (Some(k), Some(t)) => (k, t),
            _ => return Err(GenerateError::NotConfigured),
        };

        let body = serde_json::json!({
            "model": OPENROUTER_MODEL,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a puzzle game level designer. Generate levels in JSON format that are challenging but solvable.",
                },
                { "role": "user", "content": design_prompt(request) }
            ],
            "response_format": { "type": "json_object" },
        });

        let response: Value = self
            .client
            .post(OPENROUTER_ENDPOINT)
            .bearer_auth(token)
            .header("X-API-Key", key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                GenerateError::Malformed("no message content in response".to_string())
            })?;

        assemble_level(text, request)
    }
}

impl Generator for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_token.is_some()
    }

    fn generate_level<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<LevelSpec, GenerateError>> {
        Box::pin(self.call(request))
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
