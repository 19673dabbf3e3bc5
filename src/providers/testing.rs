//! Scripted backend for unit tests.

use super::{GenerateRequest, InferenceBackend, ModelInfo};
use crate::core::error::{Result, TermsageError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum Scripted {
    Text(String),
    Timeout,
    Unavailable,
    Malformed,
}

impl Scripted {
    fn to_result(&self) -> Result<String> {
        match self {
            Scripted::Text(text) => Ok(text.clone()),
            Scripted::Timeout => Err(TermsageError::Timeout("operation timed out".to_string())),
            Scripted::Unavailable => {
                Err(TermsageError::Unavailable("connection refused".to_string()))
            }
            Scripted::Malformed => Err(TermsageError::Serialization("bad json".to_string())),
        }
    }
}

/// Clones share state, so a test can keep a handle after boxing one.
#[derive(Clone)]
pub struct MockBackend {
    reply: Arc<Mutex<Scripted>>,
    models: Arc<Mutex<Scripted>>,
    installed: Arc<Mutex<Vec<ModelInfo>>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockBackend {
    pub fn answering(text: &str) -> Self {
        Self::scripted(Scripted::Text(text.to_string()))
    }

    pub fn scripted(reply: Scripted) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply)),
            models: Arc::new(Mutex::new(Scripted::Text(String::new()))),
            installed: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_models(self, names: &[&str]) -> Self {
        *self.installed.lock().unwrap() = names
            .iter()
            .map(|name| ModelInfo {
                name: name.to_string(),
                size_bytes: 4 * 1024 * 1024 * 1024,
            })
            .collect();
        self
    }

    pub fn set_reply(&self, reply: Scripted) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Makes `list_models` fail the same way `generate` would for `reply`.
    pub fn set_models_failure(&self, reply: Scripted) {
        *self.models.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.lock().unwrap().to_result()
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.models.lock().unwrap().to_result()?;
        Ok(self.installed.lock().unwrap().clone())
    }

    fn base_url(&self) -> &str {
        "http://mock:11434"
    }
}
