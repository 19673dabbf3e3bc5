use super::Feedback;
use super::registry;
use crate::assist::AssistanceClient;
use crate::core::error::TermsageError;
use crate::core::session::Session;
use console::style;
use regex::{Captures, Regex};
use serde_yml::Value;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn help() -> Feedback {
    let mut lines = vec![style("Available Commands").bold().underlined().to_string()];
    lines.extend(registry::usage_lines().into_iter().map(String::from));
    lines.push(format!(
        "<command>{} - Explain a command with AI (e.g. tar?)",
        registry::HELP_MARKER
    ));
    lines.push(format!("{} - Leave termsage", registry::EXIT_TOKENS.join(", ")));
    lines.push("Anything else runs in your shell.".to_string());
    Feedback::Text(lines.join("\n"))
}

pub fn toggle_chat(session: &mut Session) -> Feedback {
    if session.toggle_conversation_mode() {
        Feedback::Info(
            "Entered chat mode - ask questions in natural language. Type /chat to leave."
                .to_string(),
        )
    } else {
        Feedback::Info("Exited chat mode".to_string())
    }
}

pub fn history(session: &Session) -> Feedback {
    let lines: Vec<String> = session
        .recent_inputs()
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
        .collect();
    Feedback::Text(lines.join("\n"))
}

pub fn show_config(session: &Session) -> Feedback {
    let config = session.config();
    match config.to_yaml() {
        Ok(yaml) => Feedback::Text(format!(
            "{} {}\n{}",
            style("Configuration").bold(),
            style(config.path().display()).dim(),
            yaml.trim_end()
        )),
        Err(e) => Feedback::Error(format!("Could not render configuration: {}", e)),
    }
}

pub fn config_value(session: &Session, key: &str) -> Feedback {
    match session.config().get(key) {
        Some(value) => Feedback::Text(format!("{} = {}", key, render_value(&value))),
        None => Feedback::Error(format!("Unknown setting: {}", key)),
    }
}

pub async fn set_config(assistant: &AssistanceClient, session: &mut Session, args: &str) -> Feedback {
    let Some((key, raw)) = args.split_once(char::is_whitespace) else {
        return Feedback::Error("Usage: /set <key> <value>".to_string());
    };
    let raw = raw.trim();

    if key == "ai.model" {
        return switch_model(assistant, session, raw).await;
    }

    let value = serde_yml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    if let Err(e) = session.config_mut().set(key, value) {
        return Feedback::Error(e.to_string());
    }
    if let Err(e) = session.config().save() {
        return Feedback::Warning(format!("{} changed for this session but not saved: {}", key, e));
    }

    let shown = session
        .config()
        .get(key)
        .map(|v| render_value(&v))
        .unwrap_or_default();
    if key == "ai.base_url" {
        Feedback::Success(format!("{} = {} (takes effect on restart)", key, shown))
    } else {
        Feedback::Success(format!("{} = {}", key, shown))
    }
}

fn render_value(value: &Value) -> String {
    serde_yml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

pub async fn list_models(assistant: &AssistanceClient, session: &Session) -> Feedback {
    let models = match assistant.list_models().await {
        Ok(models) => models,
        Err(e) => return Feedback::Warning(service_problem(assistant, &e)),
    };

    if models.is_empty() {
        return Feedback::Info("No models installed. Install one with: ollama pull llama2".to_string());
    }

    let current = session.active_model();
    let mut lines = vec![style("Installed models:").bold().to_string()];
    for model in &models {
        if is_same_model(&model.name, current) {
            lines.push(format!(
                "  {} {} ({:.1}GB) (current)",
                style("✓").green(),
                style(&model.name).bold(),
                model.size_gb()
            ));
        } else {
            lines.push(format!("    {} ({:.1}GB)", model.name, model.size_gb()));
        }
    }
    lines.push(String::new());
    lines.push(format!("Current model: {}", current));
    lines.push("Switch with: /model <model_name>".to_string());
    Feedback::Text(lines.join("\n"))
}

/// Switches only to installed models; when the service cannot be asked the
/// switch goes through unverified.
pub async fn switch_model(assistant: &AssistanceClient, session: &mut Session, name: &str) -> Feedback {
    if name.is_empty() {
        return Feedback::Error("Usage: /model <model_name>".to_string());
    }

    let verified = match assistant.list_models().await {
        Ok(models) => {
            if !models.iter().any(|m| is_same_model(&m.name, name)) {
                let installed: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
                return Feedback::Error(format!(
                    "Model '{}' not found. Installed: {}. Install with: ollama pull {}",
                    name,
                    if installed.is_empty() {
                        "none".to_string()
                    } else {
                        installed.join(", ")
                    },
                    name
                ));
            }
            true
        }
        Err(e) => {
            warn!("could not verify model {}: {}", name, e);
            false
        }
    };

    if let Err(e) = session.set_model(name) {
        return Feedback::Warning(format!(
            "Switched to {} for this session, but the configuration was not saved: {}",
            name, e
        ));
    }
    info!("active model is now {}", name);

    if verified {
        Feedback::Success(format!("Switched to model: {}", name))
    } else {
        Feedback::Warning(format!(
            "Switched to model: {} (not verified, the assistance service is unreachable)",
            name
        ))
    }
}

/// `llama2` and `llama2:latest` name the same model.
pub fn is_same_model(installed: &str, requested: &str) -> bool {
    installed == requested || installed.strip_suffix(":latest") == Some(requested)
}

fn service_problem(assistant: &AssistanceClient, err: &TermsageError) -> String {
    match err {
        TermsageError::Unavailable(_) => format!(
            "Assistance service unavailable at {}. Start it with: ollama serve",
            assistant.base_url()
        ),
        other => format!("Could not reach the assistance service: {}", other),
    }
}

/// Changes the session directory. Never spawns a process: a child cannot
/// change the parent's directory.
pub fn change_directory(session: &mut Session, arg: &str, env_var: &Regex) -> Option<Feedback> {
    let arg = unquote(arg);

    let expanded = match expand_path(arg, env_var) {
        Some(path) => path,
        None => return Some(Feedback::Error("cd: HOME not set".to_string())),
    };
    let target = if expanded.is_absolute() {
        expanded
    } else {
        session.working_directory().join(expanded)
    };

    let canonical = match fs::canonicalize(&target) {
        Ok(path) => path,
        Err(e) => return Some(Feedback::Error(cd_error(arg, &e))),
    };
    if !canonical.is_dir() {
        return Some(Feedback::Error(format!("cd: not a directory: {}", arg)));
    }
    // Entering needs search permission, not read permission.
    if let Err(e) = fs::metadata(canonical.join(".")) {
        return Some(Feedback::Error(cd_error(arg, &e)));
    }

    session.set_working_directory(canonical);
    None
}

fn cd_error(arg: &str, err: &std::io::Error) -> String {
    match err.kind() {
        ErrorKind::NotFound => format!("cd: no such file or directory: {}", arg),
        ErrorKind::PermissionDenied => format!("cd: permission denied: {}", arg),
        _ => format!("cd: {}: {}", arg, err),
    }
}

fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

/// Expands a leading `~` and `$VAR` / `${VAR}`; unset variables become empty
/// like in the shell. `None` when a home directory is needed but unknown.
pub fn expand_path(arg: &str, env_var: &Regex) -> Option<PathBuf> {
    if arg.is_empty() || arg == "~" {
        return dirs::home_dir();
    }

    let expanded = env_var.replace_all(arg, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        env::var(name).unwrap_or_default()
    });

    let expanded = expanded.into_owned();
    if let Some(rest) = expanded.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    Some(PathBuf::from(expanded))
}

pub fn env_var_pattern() -> Result<Regex, TermsageError> {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| TermsageError::Unknown(format!("bad variable pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_variables_and_tilde() {
        let pattern = env_var_pattern().unwrap();
        let home = env::var("HOME").unwrap_or_default();

        assert_eq!(
            expand_path("$HOME/src", &pattern),
            Some(PathBuf::from(format!("{}/src", home)))
        );
        assert_eq!(
            expand_path("${HOME}/src", &pattern),
            Some(PathBuf::from(format!("{}/src", home)))
        );
        assert_eq!(
            expand_path("a$TERMSAGE_SURELY_UNSET_VAR/b", &pattern),
            Some(PathBuf::from("a/b"))
        );
        assert_eq!(expand_path("plain/dir", &pattern), Some(PathBuf::from("plain/dir")));
        if let Some(home_dir) = dirs::home_dir() {
            assert_eq!(expand_path("~", &pattern), Some(home_dir.clone()));
            assert_eq!(expand_path("~/x", &pattern), Some(home_dir.join("x")));
            assert_eq!(expand_path("", &pattern), Some(home_dir));
        }
    }

    #[test]
    fn quotes_are_stripped_in_pairs_only() {
        assert_eq!(unquote("\"my dir\""), "my dir");
        assert_eq!(unquote("'my dir'"), "my dir");
        assert_eq!(unquote("\"half"), "\"half");
    }

    #[test]
    fn latest_tag_is_implied() {
        assert!(is_same_model("llama2:latest", "llama2"));
        assert!(is_same_model("mistral", "mistral"));
        assert!(!is_same_model("llama2:13b", "llama2"));
    }
}
