//! One-time probe of the inference service on first start.

use crate::assist::AssistanceClient;
use crate::commands::Feedback;
use crate::commands::handler::is_same_model;
use crate::core::session::Session;
use tracing::{info, warn};

/// Points `ai` at what is actually installed, then marks setup done so this
/// runs once per settings file. Returns nothing when setup already ran.
pub async fn auto_configure(assistant: &AssistanceClient, session: &mut Session) -> Vec<Feedback> {
    if session.config().setup.auto_completed {
        return Vec::new();
    }

    let status = match assistant.list_models().await {
        Ok(models) if !models.is_empty() => {
            session.config_mut().ai.enabled = true;
            let current = session.active_model().to_string();
            if models.iter().any(|m| is_same_model(&m.name, &current)) {
                Feedback::Success(format!("AI ready with model {}", current))
            } else {
                let first = models[0].name.clone();
                if let Err(e) = session.set_model(&first) {
                    warn!("could not save model {}: {}", first, e);
                }
                Feedback::Success(format!(
                    "{} is not installed; using {} instead",
                    current, first
                ))
            }
        }
        Ok(_) => {
            session.config_mut().ai.enabled = false;
            Feedback::Warning(
                "No models installed, AI assistance is off. Install one with: ollama pull llama2, \
                 then run: /set ai.enabled true"
                    .to_string(),
            )
        }
        Err(e) => {
            info!("first-run probe failed: {}", e);
            session.config_mut().ai.enabled = false;
            Feedback::Warning(format!(
                "No assistance service at {}, AI assistance is off. Start it with: ollama serve, \
                 then run: /set ai.enabled true",
                assistant.base_url()
            ))
        }
    };

    session.config_mut().setup.auto_completed = true;
    if let Err(e) = session.config().save() {
        warn!("could not save first-run settings: {}", e);
    }

    vec![
        status,
        Feedback::Info(
            "First time using termsage? Type help for the built-in commands, or try git? to see AI help."
                .to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::providers::testing::{MockBackend, Scripted};
    use crate::system::{ShellType, SystemInfo};
    use tempfile::TempDir;

    fn setup(backend: &MockBackend) -> (TempDir, Session, AssistanceClient) {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join("config.yaml"));
        let session = Session::new(config, dir.path().to_path_buf());
        let system = SystemInfo {
            os_info: "Linux test".to_string(),
            shell_path: "/bin/sh".to_string(),
            shell_type: ShellType::Posix,
        };
        let client = AssistanceClient::new(Box::new(backend.clone()), system);
        (dir, session, client)
    }

    #[tokio::test]
    async fn picks_the_first_installed_model_when_the_default_is_missing() {
        let backend = MockBackend::answering("ok").with_models(&["mistral:7b", "phi3"]);
        let (_dir, mut session, client) = setup(&backend);

        let notes = auto_configure(&client, &mut session).await;

        assert!(matches!(notes[0], Feedback::Success(_)));
        assert_eq!(session.active_model(), "mistral:7b");
        let reloaded = Config::load_from(session.config().path().to_path_buf());
        assert_eq!(reloaded.ai.model, "mistral:7b");
        assert!(reloaded.ai.enabled);
        assert!(reloaded.setup.auto_completed);
    }

    #[tokio::test]
    async fn keeps_the_configured_model_when_installed() {
        let backend = MockBackend::answering("ok").with_models(&["phi3", "llama2:latest"]);
        let (_dir, mut session, client) = setup(&backend);

        auto_configure(&client, &mut session).await;

        assert_eq!(session.active_model(), "llama2");
        assert!(session.ai_enabled());
    }

    #[tokio::test]
    async fn missing_service_turns_ai_off_and_persists_it() {
        let backend = MockBackend::answering("ok");
        backend.set_models_failure(Scripted::Unavailable);
        let (_dir, mut session, client) = setup(&backend);

        let notes = auto_configure(&client, &mut session).await;

        match &notes[0] {
            Feedback::Warning(text) => assert!(text.contains("ollama serve")),
            other => panic!("unexpected note {:?}", other),
        }
        assert!(!session.ai_enabled());
        let reloaded = Config::load_from(session.config().path().to_path_buf());
        assert!(!reloaded.ai.enabled);
        assert!(reloaded.setup.auto_completed);
    }

    #[tokio::test]
    async fn no_installed_models_turns_ai_off() {
        let backend = MockBackend::answering("ok");
        let (_dir, mut session, client) = setup(&backend);

        auto_configure(&client, &mut session).await;

        assert!(!session.ai_enabled());
    }

    #[tokio::test]
    async fn runs_only_once() {
        let backend = MockBackend::answering("ok");
        backend.set_models_failure(Scripted::Unavailable);
        let (_dir, mut session, client) = setup(&backend);
        auto_configure(&client, &mut session).await;

        backend.set_models_failure(Scripted::Text(String::new()));
        let _backend = backend.with_models(&["phi3"]);
        let notes = auto_configure(&client, &mut session).await;

        assert!(notes.is_empty());
        assert!(!session.ai_enabled());
        assert_eq!(session.active_model(), "llama2");
    }
}
