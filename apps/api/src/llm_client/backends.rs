//! HTTP generation backends.
//!
//! - `Seq2SeqBackend`: text-generation server (`POST /generate`, TGI wire format).
//! - `ChatBackend`: OpenAI-compatible chat server (`POST /v1/chat/completions`).
//! - `UnavailableBackend`: stands in for a backend that failed to load.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::llm_client::prompts::CHAT_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};

pub const DEFAULT_PRIMARY_MODEL: &str = "google/flan-t5-base";
pub const DEFAULT_SECONDARY_MODEL: &str = "meta-llama/Llama-2-7b-chat-hf";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
/// Input token limit applied by the seq2seq server before generation.
const SEQ2SEQ_MAX_INPUT_TOKENS: u32 = 512;

/// A base URL plus the HTTP client and credentials used to reach it.
#[derive(Clone)]
pub struct HttpEndpoint {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpEndpoint {
    /// `timeout_secs = None` leaves requests unbounded.
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Readiness check against `GET /health`.
    pub async fn probe(&self) -> Result<(), LlmError> {
        let response = self
            .authorize(self.client.get(self.url("/health")))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Unavailable(format!(
                "health check returned {status}: {}",
                error_message(&body)
            )));
        }
        Ok(())
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response.json::<R>().await?)
    }
}

/// Pulls a readable message out of an error body: `{"error": "..."}`,
/// `{"error": {"message": "..."}}`, or the raw body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| {
            e.as_str()
                .map(str::to_string)
                .or_else(|| e.get("message").and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Seq2seq (primary)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    do_sample: bool,
    temperature: f32,
    truncate: u32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// TGI answers with an object; hosted inference APIs answer with a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(GeneratedText),
    Batch(Vec<GeneratedText>),
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        match self {
            GenerateResponse::Single(g) => Some(g.generated_text),
            GenerateResponse::Batch(batch) => batch.into_iter().next().map(|g| g.generated_text),
        }
    }
}

pub struct Seq2SeqBackend {
    endpoint: HttpEndpoint,
    model_id: String,
}

impl Seq2SeqBackend {
    pub fn new(endpoint: HttpEndpoint, model_id: String) -> Self {
        Self { endpoint, model_id }
    }
}

#[async_trait]
impl TextGenerator for Seq2SeqBackend {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: max_tokens,
                do_sample: true,
                temperature: TEMPERATURE,
                truncate: SEQ2SEQ_MAX_INPUT_TOKENS,
            },
        };

        let response: GenerateResponse = self.endpoint.post_json("/generate", &request).await?;
        let text = response.into_text().ok_or(LlmError::EmptyContent)?;
        debug!("{} generated {} chars", self.model_id, text.len());
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Chat (secondary)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct ChatBackend {
    endpoint: HttpEndpoint,
    model_id: String,
}

impl ChatBackend {
    pub fn new(endpoint: HttpEndpoint, model_id: String) -> Self {
        Self { endpoint, model_id }
    }
}

#[async_trait]
impl TextGenerator for ChatBackend {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model_id,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: CHAT_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: false,
        };

        let response: ChatResponse = self
            .endpoint
            .post_json("/v1/chat/completions", &request)
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;
        debug!("{} generated {} chars", self.model_id, text.len());
        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Unavailable
// ────────────────────────────────────────────────────────────────────────────

/// A backend that never loaded. Every call fails with `LlmError::Unavailable`.
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for UnavailableBackend {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        Err(LlmError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
