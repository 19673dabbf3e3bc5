//! Requests to the inference service on behalf of the dispatcher.
//!
//! Nothing in here returns an error: every failure is turned into a
//! [`Reply::Fallback`] the shell can print as-is, so the shell keeps working
//! as a plain command runner when the service is down.

pub mod context;
pub mod prompts;

use crate::core::error::{Result, TermsageError};
use crate::core::session::{CacheKey, Session};
use crate::display;
use crate::providers::{GenerateRequest, InferenceBackend, ModelInfo};
use crate::system::SystemInfo;
use context::ProjectContext;
use std::time::Duration;
use tracing::{debug, warn};

const HELP_MAX_TOKENS: u32 = 300;
const ERROR_MAX_TOKENS: u32 = 200;
const CHAT_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text produced by the model (possibly from the cache).
    Generated(String),
    /// Explanation of why no answer is available, with a way forward.
    Fallback(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Generated(text) | Reply::Fallback(text) => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Reply::Generated(_))
    }
}

#[derive(Clone, Copy)]
enum Purpose<'a> {
    Help(&'a str),
    Chat,
    ErrorAnalysis,
}

impl Purpose<'_> {
    fn max_tokens(self) -> u32 {
        match self {
            Purpose::Help(_) => HELP_MAX_TOKENS,
            Purpose::Chat => CHAT_MAX_TOKENS,
            Purpose::ErrorAnalysis => ERROR_MAX_TOKENS,
        }
    }

    fn progress(self) -> String {
        match self {
            Purpose::Help(command) => format!("Getting help for {}...", command),
            Purpose::Chat => "Thinking...".to_string(),
            Purpose::ErrorAnalysis => "Analyzing the error...".to_string(),
        }
    }
}

pub struct AssistanceClient {
    backend: Box<dyn InferenceBackend>,
    system: SystemInfo,
}

impl AssistanceClient {
    pub fn new(backend: Box<dyn InferenceBackend>, system: SystemInfo) -> Self {
        Self { backend, system }
    }

    pub fn base_url(&self) -> &str {
        self.backend.base_url()
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.backend.list_models().await
    }

    pub async fn is_available(&self) -> bool {
        self.backend.list_models().await.is_ok()
    }

    /// Explains `command`, answering from the session cache when the same
    /// command was already explained in the same directory.
    pub async fn get_help(&self, session: &mut Session, command: &str) -> Reply {
        let command = command.trim();
        if command.is_empty() {
            return Reply::Fallback("Usage: <command>? (e.g. git?, docker?, ls?)".to_string());
        }
        if !session.ai_enabled() {
            return Reply::Fallback(format!(
                "AI assistance is disabled. Try: man {}",
                command
            ));
        }

        let key = CacheKey::new(command, session.working_directory());
        if let Some(cached) = session.cache_get(&key) {
            debug!("help for '{}' served from cache", command);
            return Reply::Generated(cached.to_string());
        }

        let context = ProjectContext::detect(session.working_directory());
        let prompt = prompts::help(command, &context.describe(), &self.system);

        match self.generate(session, prompt, Purpose::Help(command)).await {
            Ok(text) => {
                session.cache_put(key, text.clone());
                Reply::Generated(text)
            }
            Err(e) => Reply::Fallback(self.fallback(session, &e, Purpose::Help(command))),
        }
    }

    pub async fn chat(&self, session: &Session, message: &str) -> Reply {
        let message = message.trim();
        if message.is_empty() {
            return Reply::Fallback("Please provide a message to chat about.".to_string());
        }
        if !session.ai_enabled() {
            return Reply::Fallback("AI assistance is disabled; chat is unavailable.".to_string());
        }

        let prompt = prompts::chat(message, &self.system);
        match self.generate(session, prompt, Purpose::Chat).await {
            Ok(text) => Reply::Generated(text),
            Err(e) => Reply::Fallback(self.fallback(session, &e, Purpose::Chat)),
        }
    }

    pub async fn analyze_error(&self, session: &Session, command: &str, stderr: &str) -> Reply {
        if !session.ai_enabled() {
            return Reply::Fallback("AI assistance is disabled; no error analysis.".to_string());
        }

        let prompt = prompts::error_analysis(command, stderr, &self.system);
        match self.generate(session, prompt, Purpose::ErrorAnalysis).await {
            Ok(text) => Reply::Generated(text),
            Err(e) => Reply::Fallback(self.fallback(session, &e, Purpose::ErrorAnalysis)),
        }
    }

    /// Only uncached requests get here, so only they show a spinner.
    async fn generate(
        &self,
        session: &Session,
        prompt: String,
        purpose: Purpose<'_>,
    ) -> Result<String> {
        let ai = &session.config().ai;
        let request = GenerateRequest {
            model: session.active_model().to_string(),
            prompt,
            max_tokens: purpose.max_tokens(),
            temperature: ai.temperature,
            timeout: Duration::from_secs(ai.timeout_secs.max(1)),
        };

        let spinner = display::spinner(&purpose.progress());
        let result = self.backend.generate(&request).await;
        spinner.finish_and_clear();
        result
    }

    fn fallback(&self, session: &Session, err: &TermsageError, purpose: Purpose<'_>) -> String {
        warn!("assistance request failed: {}", err);
        let model = session.active_model();

        let manual = match purpose {
            Purpose::Help(command) => format!(" Meanwhile, try: man {}", command),
            _ => String::new(),
        };
        let what = match purpose {
            Purpose::Help(_) => "help",
            Purpose::Chat => "a chat response",
            Purpose::ErrorAnalysis => "error suggestions",
        };

        match err {
            TermsageError::Timeout(_) => format!(
                "Timed out waiting for {}. Try a smaller model.{}",
                model, manual
            ),
            TermsageError::Unavailable(_) => format!(
                "Assistance service unavailable at {}. Start it with: ollama serve.{}",
                self.backend.base_url(),
                manual
            ),
            other => format!("Could not get {} from {}: {}.{}", what, model, other, manual),
        }
    }
}
