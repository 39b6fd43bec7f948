//! Ordered fallback across generators: the first link that produces non-empty text wins.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm_client::{strip_echoed_prompt, Backend, LlmError, TextGenerator};

pub struct FallbackChain {
    links: Vec<(Backend, Arc<dyn TextGenerator>)>,
}

impl FallbackChain {
    pub fn new(backend: Backend, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            links: vec![(backend, generator)],
        }
    }

    /// Appends a link tried only when every earlier link failed.
    pub fn or_else(mut self, backend: Backend, generator: Arc<dyn TextGenerator>) -> Self {
        self.links.push((backend, generator));
        self
    }

    /// Each link is tried exactly once with the same prompt and budget.
    /// Returns the error of the last link when all of them fail.
    pub async fn run(&self, prompt: &str, max_tokens: u32) -> Result<(Backend, String), LlmError> {
        let mut last_error: Option<LlmError> = None;

        for (backend, generator) in &self.links {
            debug!(
                "Generating with {} ({:?}): prompt_chars={}, max_tokens={}",
                generator.name(),
                backend,
                prompt.chars().count(),
                max_tokens
            );

            match generator.generate(prompt, max_tokens).await {
                Ok(raw) => {
                    let text = strip_echoed_prompt(prompt, &raw);
                    if text.is_empty() {
                        warn!("{} returned empty content", generator.name());
                        last_error = Some(LlmError::EmptyContent);
                        continue;
                    }
                    return Ok((*backend, text));
                }
                Err(e) => {
                    warn!("{} failed: {e}", generator.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Unavailable("empty fallback chain".to_string())))
    }
}
