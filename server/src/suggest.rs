//! Chat-completion client for item, dish and ingredient suggestions.
//!
//! Talks to any OpenAI-compatible endpoint. One request per call; failures
//! are returned to the caller as-is, never retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

const ITEM_SYSTEM_PROMPT: &str = "You are a helpful assistant that helps choose grocery items to add to a list. Respond with only the name of a single grocery item.";
const DISH_SYSTEM_PROMPT: &str = "You are a helpful assistant that recommends dishes based on available ingredients. Respond with only the name of a single dish.";
const INGREDIENTS_SYSTEM_PROMPT: &str = "You are a helpful assistant that provides ingredients for dishes. Respond with a comma-separated list of ingredients.";

const IMAGE_SIZE: &str = "256x256";

#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub api_key: String,
    /// API root without a trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("suggestion API key is not configured")]
    MissingKey,
    #[error("suggestion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("suggestion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected suggestion API response: {0}")]
    Decode(String),
    #[error("suggestion API returned no content")]
    Empty,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u8,
    size: &'static str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

// ─── Prompts ─────────────────────────────────────────────────────────────────

fn item_prompt(names: &[String]) -> String {
    format!(
        "Based on the current grocery list: {}, suggest a recommended item.",
        names.join(", ")
    )
}

fn dish_prompt(names: &[String]) -> String {
    format!(
        "Based on the current grocery list: {}, suggest a dish that can be made with some of these ingredients. pay extra focus to the latest ones",
        names.join(", ")
    )
}

fn ingredients_prompt(dish: &str, names: &[String]) -> String {
    format!(
        "Provide a list of ingredients for {dish}. Only include ingredients that are not already in this list: {}.",
        names.join(", ")
    )
}

fn image_prompt(item: &str) -> String {
    format!("A simple illustration of {item} on a plain background")
}

/// Split a comma-separated ingredient reply into trimmed, non-empty names.
pub fn parse_ingredients(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// ─── Client ──────────────────────────────────────────────────────────────────

pub struct SuggestionClient {
    http: reqwest::Client,
    config: SuggestConfig,
}

impl SuggestionClient {
    pub fn new(config: SuggestConfig) -> Result<Self, SuggestError> {
        if config.api_key.trim().is_empty() {
            return Err(SuggestError::MissingKey);
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// One grocery item that would fit the current list.
    pub async fn suggest_item(&self, names: &[String]) -> Result<String, SuggestError> {
        self.chat(ITEM_SYSTEM_PROMPT, &item_prompt(names)).await
    }

    /// One dish that could be made from the list, weighted towards recent items.
    pub async fn suggest_dish(&self, names: &[String]) -> Result<String, SuggestError> {
        self.chat(DISH_SYSTEM_PROMPT, &dish_prompt(names)).await
    }

    /// Ingredients for `dish` that are not already among `names`.
    pub async fn dish_ingredients(
        &self,
        dish: &str,
        names: &[String],
    ) -> Result<Vec<String>, SuggestError> {
        let reply = self
            .chat(INGREDIENTS_SYSTEM_PROMPT, &ingredients_prompt(dish, names))
            .await?;
        Ok(parse_ingredients(&reply))
    }

    /// URL of a generated picture of `item`.
    pub async fn item_image(&self, item: &str) -> Result<String, SuggestError> {
        let body = ImageRequest {
            model: &self.config.image_model,
            prompt: image_prompt(item),
            n: 1,
            size: IMAGE_SIZE,
        };
        let response: ImageResponse = self.post("images/generations", &body).await?;
        response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or(SuggestError::Empty)
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, SuggestError> {
        let body = ChatRequest {
            model: &self.config.chat_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };
        let response: ChatResponse = self.post("chat/completions", &body).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(SuggestError::Empty)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(SuggestError::Empty);
        }
        Ok(content.to_string())
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, SuggestError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{path}", self.config.base_url);
        debug!(%url, "calling suggestion API");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SuggestError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| SuggestError::Decode(e.to_string()))
    }
}
