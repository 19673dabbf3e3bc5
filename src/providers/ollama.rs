use super::base_client::HttpClient;
use super::{GenerateRequest, InferenceBackend, ModelInfo};
use crate::core::error::{Result, TermsageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TAGS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
    #[serde(default)]
    size: u64,
}

/// Client for an Ollama-compatible server (`/api/generate`, `/api/tags`).
#[derive(Clone)]
pub struct OllamaBackend {
    client: HttpClient,
}

impl OllamaBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url)?,
        })
    }
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        debug!(model = %request.model, max_tokens = request.max_tokens, "POST api/generate");
        let parsed: GenerateResponse = self
            .client
            .post_json("api/generate", &body, request.timeout)
            .await?;

        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(TermsageError::Api(format!(
                "empty response from {}",
                request.model
            )));
        }
        Ok(text.to_string())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let parsed: TagsResponse = self.client.get_json("api/tags", TAGS_TIMEOUT).await?;
        Ok(parsed
            .models
            .into_iter()
            .map(|m| ModelInfo {
                name: m.name,
                size_bytes: m.size,
            })
            .collect())
    }

    fn base_url(&self) -> &str {
        self.client.base_url()
    }
}
