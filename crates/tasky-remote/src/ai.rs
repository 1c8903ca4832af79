//! Board description generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tasky_core::{AppConfig, TaskyError, TaskyResult};

use crate::supabase::client::{error_message, transport};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const SYSTEM_PROMPT: &str =
    "Write a short, clear Kanban board project description base on its title (1-2 sentences).";
const MAX_TOKENS: u32 = 120;
const TEMPERATURE: f64 = 0.7;

/// Turns a board title into a one or two sentence description.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn describe(&self, title: &str) -> TaskyResult<String>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

fn openai_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| error_message(body))
}

/// Chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiDescriber {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiDescriber {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> TaskyResult<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| TaskyError::Config("OPENAI_API_KEY is not set".into()))?;
        Ok(Self::new(api_key, config.effective_ai_model()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl DescriptionGenerator for OpenAiDescriber {
    async fn describe(&self, title: &str) -> TaskyResult<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Title: {title}") },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        tracing::debug!("Requesting description from {}", self.model);
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(TaskyError::Remote(openai_error(&text)));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| TaskyError::Serialization(e.to_string()))?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DescribeRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DescribeResponse {
    pub description: String,
}

/// Client of the `tasky-server` passthrough endpoint.
#[derive(Debug, Clone)]
pub struct ServerDescriber {
    http: Client,
    base_url: String,
}

impl ServerDescriber {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for a server listening on `addr` (`host:port`).
    pub fn for_addr(addr: &str) -> Self {
        Self::new(format!("http://{addr}"))
    }
}

#[async_trait]
impl DescriptionGenerator for ServerDescriber {
    async fn describe(&self, title: &str) -> TaskyResult<String> {
        let response = self
            .http
            .post(format!("{}/api/ai/board-desc", self.base_url))
            .json(&DescribeRequest {
                title: Some(title.to_string()),
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(TaskyError::Remote(error_message(&text)));
        }
        let parsed: DescribeResponse =
            serde_json::from_str(&text).map_err(|e| TaskyError::Serialization(e.to_string()))?;
        Ok(parsed.description)
    }
}
