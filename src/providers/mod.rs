use crate::core::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod base_client;
pub mod ollama;
#[cfg(test)]
pub mod testing;

pub use ollama::OllamaBackend;

/// One non-streaming completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

/// An installed model as reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub size_bytes: u64,
}

impl ModelInfo {
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    fn base_url(&self) -> &str;
}
