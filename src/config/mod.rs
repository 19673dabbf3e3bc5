use crate::core::error::{Result, TermsageError};
use serde::{Deserialize, Serialize};
use serde_yml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Error analysis after a failed delegated command is opt-out, not opt-in.
pub const DEFAULT_HELP_ON_ERROR: bool = true;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub history_size: usize,
    /// Show contextual tips every this many inputs; 0 disables them.
    pub tips_interval: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            history_size: 1000,
            tips_interval: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    pub help_on_error: bool,
    pub timeout_secs: u64,
    pub temperature: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            help_on_error: DEFAULT_HELP_ON_ERROR,
            timeout_secs: 30,
            temperature: 0.7,
        }
    }
}

/// First-run bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Set once the installed models were probed and `ai` adjusted.
    pub auto_completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub terminal: TerminalConfig,
    pub ai: AiConfig,
    pub setup: SetupConfig,
    #[serde(skip)]
    path: PathBuf,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".termsage")
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("history")
    }

    /// Defaults bound to `path`; nothing is written.
    pub fn with_path(path: impl Into<PathBuf>) -> Config {
        Config {
            path: path.into(),
            ..Config::default()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings file, never failing: a missing file is created with
    /// defaults, a malformed one is replaced by defaults, and a file missing
    /// some keys is re-saved with the defaults filled in.
    pub fn load_from(path: impl Into<PathBuf>) -> Config {
        let path = path.into();

        if !path.exists() {
            info!("creating default configuration at {}", path.display());
            let config = Config::with_path(path);
            config.save_or_warn();
            return config;
        }

        match Self::parse(&path) {
            Ok((config, complete)) => {
                if !complete {
                    debug!("filling in missing configuration keys");
                    config.save_or_warn();
                }
                config
            }
            Err(e) => {
                warn!("could not load {} ({}), using defaults", path.display(), e);
                let config = Config::with_path(path);
                config.save_or_warn();
                config
            }
        }
    }

    pub fn load() -> Config {
        Self::load_from(Self::default_path())
    }

    fn parse(path: &Path) -> Result<(Config, bool)> {
        let contents = fs::read_to_string(path)?;
        let raw: Value = serde_yml::from_str(&contents)
            .map_err(|e| TermsageError::Config(format!("Parse {}: {}", path.display(), e)))?;

        let mut config: Config = if raw.is_null() {
            Config::default()
        } else {
            serde_yml::from_value(raw.clone())
                .map_err(|e| TermsageError::Config(format!("Parse {}: {}", path.display(), e)))?
        };
        config.path = path.to_path_buf();

        let complete = serde_yml::to_value(&config)? == raw;
        Ok((config, complete))
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&self.path, yaml_content)?;
        Ok(())
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!("could not save {}: {}", self.path.display(), e);
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Looks up a value by dot path, e.g. `ai.model`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let root = serde_yml::to_value(self).ok()?;
        key.split('.')
            .try_fold(root, |node, part| node.get(part).cloned())
    }

    /// Replaces a value by dot path. Only existing keys can be set and the
    /// result must still deserialize, so a bad value leaves `self` untouched.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let unknown = || TermsageError::Config(format!("unknown setting: {}", key));

        let mut root = serde_yml::to_value(&*self)?;
        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };

        let mut node = &mut root;
        if let Some(parents) = parents {
            for part in parents.split('.') {
                node = node.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let mapping = node.as_mapping_mut().ok_or_else(unknown)?;
        if !mapping.contains_key(leaf) {
            return Err(unknown());
        }
        mapping.insert(Value::String(leaf.to_string()), value);

        let mut updated: Config = serde_yml::from_value(root)
            .map_err(|e| TermsageError::Config(format!("invalid value for {}: {}", key, e)))?;
        updated.path = std::mem::take(&mut self.path);
        *self = updated;
        Ok(())
    }
}
