/// Model Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a model backend directly.
/// All generation MUST go through `ModelClient::invoke`.
///
/// Two backends sit behind the `TextGenerator` contract:
/// - primary: short-form seq2seq model used for structured extraction. Must be
///   reachable at startup.
/// - secondary: larger chat-tuned model used for conversation. Best-effort; every
///   secondary call falls back to the primary when it is unavailable or errors.
///
/// The client never returns an error. A call that fails on every backend yields
/// `GENERATION_FAILURE` and callers apply their own fallback.
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub mod backends;
pub mod fallback;
pub mod prompts;
#[cfg(test)]
pub mod testing;

use backends::{ChatBackend, HttpEndpoint, Seq2SeqBackend, UnavailableBackend};
use fallback::FallbackChain;

/// Literal returned when no backend produced output. Callers treat it as "no output".
pub const GENERATION_FAILURE: &str = "Error generating response";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A generative backend: `generate(prompt, budget) → text`, failing with `LlmError`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Primary,
    Secondary,
}

/// The text produced by an invocation and the backend that produced it.
/// `served_by` is `None` when every backend failed and `text` is `GENERATION_FAILURE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub served_by: Option<Backend>,
}

impl Generation {
    pub fn failed(&self) -> bool {
        self.served_by.is_none()
    }
}

/// Shared handle to both backends. Cheap to clone; backends are read-only.
#[derive(Clone)]
pub struct ModelClient {
    primary: Arc<dyn TextGenerator>,
    secondary: Arc<dyn TextGenerator>,
    secondary_available: bool,
}

impl ModelClient {
    /// `secondary = None` marks the secondary as unavailable for the process lifetime.
    pub fn new(
        primary: Arc<dyn TextGenerator>,
        secondary: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let secondary_available = secondary.is_some();
        let secondary = match secondary {
            Some(backend) => backend,
            None => Arc::new(UnavailableBackend::new("secondary model failed to load")),
        };
        Self {
            primary,
            secondary,
            secondary_available,
        }
    }

    /// Builds both HTTP backends and probes them. A primary probe failure is fatal;
    /// a secondary probe failure is logged and the secondary is marked unavailable.
    pub async fn connect(config: &Config) -> Result<Self> {
        let primary_endpoint = HttpEndpoint::new(
            &config.primary_model_url,
            config.model_api_token.clone(),
            config.model_timeout_secs,
        )?;
        primary_endpoint
            .probe()
            .await
            .with_context(|| {
                format!("Primary model '{}' failed to load", config.primary_model_id)
            })?;
        info!("Primary model ready: {}", config.primary_model_id);
        let primary: Arc<dyn TextGenerator> = Arc::new(Seq2SeqBackend::new(
            primary_endpoint,
            config.primary_model_id.clone(),
        ));

        let secondary = match &config.secondary_model_url {
            None => {
                warn!("SECONDARY_MODEL_URL not set; chat falls back to the primary model");
                None
            }
            Some(url) => {
                let endpoint = HttpEndpoint::new(
                    url,
                    config.model_api_token.clone(),
                    config.model_timeout_secs,
                )?;
                match endpoint.probe().await {
                    Ok(()) => {
                        info!("Secondary model ready: {}", config.secondary_model_id);
                        let backend: Arc<dyn TextGenerator> = Arc::new(ChatBackend::new(
                            endpoint,
                            config.secondary_model_id.clone(),
                        ));
                        Some(backend)
                    }
                    Err(e) => {
                        warn!(
                            "Could not load secondary model '{}': {e}. Falling back to the primary model for chat",
                            config.secondary_model_id
                        );
                        None
                    }
                }
            }
        };

        Ok(Self::new(primary, secondary))
    }

    pub fn secondary_available(&self) -> bool {
        self.secondary_available
    }

    fn chain_for(&self, backend: Backend) -> FallbackChain {
        match backend {
            Backend::Primary => FallbackChain::new(Backend::Primary, self.primary.clone()),
            Backend::Secondary => FallbackChain::new(Backend::Secondary, self.secondary.clone())
                .or_else(Backend::Primary, self.primary.clone()),
        }
    }

    /// Runs `prompt` against `backend` (falling back per the chain) and never fails.
    pub async fn invoke(&self, backend: Backend, prompt: &str, max_tokens: u32) -> Generation {
        match self.chain_for(backend).run(prompt, max_tokens).await {
            Ok((served_by, text)) => Generation {
                text,
                served_by: Some(served_by),
            },
            Err(e) => {
                warn!("Generation failed on every backend: {e}");
                Generation {
                    text: GENERATION_FAILURE.to_string(),
                    served_by: None,
                }
            }
        }
    }
}

/// Seq2seq decoders sometimes echo the prompt ahead of the answer; drop that prefix.
pub fn strip_echoed_prompt(prompt: &str, response: &str) -> String {
    let prompt = prompt.trim();
    let response = response.trim();
    if prompt.is_empty() {
        return response.to_string();
    }
    response
        .strip_prefix(prompt)
        .unwrap_or(response)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedGenerator;
    use super::*;

    fn client(
        primary: &Arc<ScriptedGenerator>,
        secondary: Option<&Arc<ScriptedGenerator>>,
    ) -> ModelClient {
        ModelClient::new(
            primary.clone() as Arc<dyn TextGenerator>,
            secondary.map(|s| s.clone() as Arc<dyn TextGenerator>),
        )
    }

    fn config(primary_url: String, secondary_url: Option<String>) -> Config {
        Config {
            primary_model_url: primary_url,
            primary_model_id: "primary-test".to_string(),
            secondary_model_url: secondary_url,
            secondary_model_id: "secondary-test".to_string(),
            model_api_token: None,
            model_timeout_secs: Some(5),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    /// A local server answering `GET /health` with 200.
    async fn healthy_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route("/health", axum::routing::get(|| async { "ok" }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// An address nothing is listening on.
    async fn closed_port() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_connect_fails_when_primary_is_unreachable() {
        let result = ModelClient::connect(&config(closed_port().await, None)).await;
        let err = result.err().unwrap();
        assert!(err.to_string().contains("primary-test"));
    }

    #[tokio::test]
    async fn test_connect_degrades_when_secondary_is_unreachable() {
        let primary = healthy_server().await;
        let secondary = closed_port().await;
        let client = ModelClient::connect(&config(primary, Some(secondary)))
            .await
            .unwrap();
        assert!(!client.secondary_available());
    }

    #[tokio::test]
    async fn test_connect_without_secondary_url_marks_it_unavailable() {
        let client = ModelClient::connect(&config(healthy_server().await, None))
            .await
            .unwrap();
        assert!(!client.secondary_available());
    }

    #[tokio::test]
    async fn test_connect_with_healthy_backends() {
        let primary = healthy_server().await;
        let secondary = healthy_server().await;
        let client = ModelClient::connect(&config(primary, Some(secondary)))
            .await
            .unwrap();
        assert!(client.secondary_available());
    }

    #[test]
    fn test_strip_echoed_prompt_removes_prefix() {
        let prompt = "Identify the job role.\nRole:";
        let response = "Identify the job role.\nRole: Data Engineer";
        assert_eq!(strip_echoed_prompt(prompt, response), "Data Engineer");
    }

    #[test]
    fn test_strip_echoed_prompt_leaves_plain_answer() {
        assert_eq!(strip_echoed_prompt("Role:", "  Data Engineer \n"), "Data Engineer");
    }

    #[test]
    fn test_strip_echoed_prompt_only_strips_prefix() {
        let response = "Answer first. Role:";
        assert_eq!(strip_echoed_prompt("Role:", response), response);
    }

    #[tokio::test]
    async fn test_primary_call_returns_primary_text() {
        let primary = ScriptedGenerator::replying("primary", "Python, Rust");
        let generation = client(&primary, None)
            .invoke(Backend::Primary, "keywords?", 100)
            .await;
        assert_eq!(generation.text, "Python, Rust");
        assert_eq!(generation.served_by, Some(Backend::Primary));
        assert_eq!(primary.calls(), vec!["keywords?".to_string()]);
    }

    #[tokio::test]
    async fn test_primary_failure_returns_sentinel() {
        let primary = ScriptedGenerator::failing("primary");
        let generation = client(&primary, None)
            .invoke(Backend::Primary, "keywords?", 100)
            .await;
        assert!(generation.failed());
        assert_eq!(generation.text, GENERATION_FAILURE);
        assert_eq!(primary.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_secondary_serves_when_available() {
        let primary = ScriptedGenerator::replying("primary", "from primary");
        let secondary = ScriptedGenerator::replying("secondary", "from secondary");
        let generation = client(&primary, Some(&secondary))
            .invoke(Backend::Secondary, "hello", 250)
            .await;
        assert_eq!(generation.text, "from secondary");
        assert_eq!(generation.served_by, Some(Backend::Secondary));
        assert!(primary.calls().is_empty());
    }

    #[tokio::test]
    async fn test_secondary_error_reissues_prompt_on_primary_once() {
        let primary = ScriptedGenerator::replying("primary", "from primary");
        let secondary = ScriptedGenerator::failing("secondary");
        let generation = client(&primary, Some(&secondary))
            .invoke(Backend::Secondary, "hello", 250)
            .await;
        assert_eq!(generation.text, "from primary");
        assert_eq!(generation.served_by, Some(Backend::Primary));
        assert_eq!(secondary.calls(), vec!["hello".to_string()]);
        assert_eq!(primary.calls(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_unavailable_secondary_routes_every_call_to_primary() {
        let primary = ScriptedGenerator::replying("primary", "from primary");
        let client = client(&primary, None);
        assert!(!client.secondary_available());

        for prompt in ["first chat prompt", "second chat prompt"] {
            let generation = client.invoke(Backend::Secondary, prompt, 250).await;
            assert_eq!(generation.served_by, Some(Backend::Primary));
            assert!(!generation.text.is_empty());
        }
        assert_eq!(
            primary.calls(),
            vec!["first chat prompt".to_string(), "second chat prompt".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unavailable_secondary_and_failing_primary_is_never_empty() {
        let primary = ScriptedGenerator::failing("primary");
        let generation = client(&primary, None)
            .invoke(Backend::Secondary, "chat prompt", 250)
            .await;
        assert_eq!(generation.text, GENERATION_FAILURE);
        assert_eq!(primary.calls(), vec!["chat prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_primary_output_is_treated_as_failure() {
        let primary = ScriptedGenerator::replying("primary", "   ");
        let generation = client(&primary, None)
            .invoke(Backend::Primary, "role?", 50)
            .await;
        assert!(generation.failed());
        assert_eq!(generation.text, GENERATION_FAILURE);
    }

    #[tokio::test]
    async fn test_echoed_prompt_is_stripped_from_output() {
        let primary = ScriptedGenerator::replying("primary", "Role: Role: Nurse");
        let generation = client(&primary, None)
            .invoke(Backend::Primary, "Role:", 50)
            .await;
        assert_eq!(generation.text, "Role: Nurse");
    }
}
