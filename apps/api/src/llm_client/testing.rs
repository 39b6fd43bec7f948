//! Scripted `TextGenerator` test double. Records every prompt it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};

type Script = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

pub struct ScriptedGenerator {
    name: String,
    script: Script,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Answers every prompt through `script`.
    pub fn with<F>(name: &str, script: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            name: name.to_string(),
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(name: &str, text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::with(name, move |_| Ok(text.clone()))
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Self::with(name, |_| Err(LlmError::Api {
            status: 500,
            message: "scripted failure".to_string(),
        }))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        (self.script)(prompt)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
