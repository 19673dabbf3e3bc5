use crate::config::{Config, DEFAULT_MODEL};
use crate::core::error::{Result, TermsageError};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MAX_RECENT_INPUTS: usize = 50;
pub const MAX_CACHED_RESPONSES: usize = 20;

/// Help answers are only reused for the same command in the same directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub command: String,
    pub directory: PathBuf,
}

impl CacheKey {
    pub fn new(command: &str, directory: &Path) -> Self {
        Self {
            command: command.to_string(),
            directory: directory.to_path_buf(),
        }
    }
}

/// Bounded cache that evicts by insertion order, not by use.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

impl ResponseCache {
    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn put(&mut self, key: CacheKey, value: String) {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        if self.order.len() == MAX_CACHED_RESPONSES {
            if let Some(oldest) = self.order.pop_front() {
                debug!("evicting cached help for '{}'", oldest.command);
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct Session {
    working_directory: PathBuf,
    active_model: String,
    conversational_mode: bool,
    recent_inputs: VecDeque<String>,
    input_count: u64,
    response_cache: ResponseCache,
    ai_suppressed: bool,
    config: Config,
}

impl Session {
    pub fn new(config: Config, working_directory: PathBuf) -> Self {
        let active_model = if config.ai.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.ai.model.clone()
        };

        Self {
            working_directory,
            active_model,
            conversational_mode: false,
            recent_inputs: VecDeque::with_capacity(MAX_RECENT_INPUTS),
            input_count: 0,
            response_cache: ResponseCache::default(),
            ai_suppressed: false,
            config,
        }
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn set_working_directory(&mut self, path: PathBuf) {
        self.working_directory = path;
    }

    pub fn active_model(&self) -> &str {
        &self.active_model
    }

    /// Switches the model for this session only, leaving the file alone.
    pub fn override_model(&mut self, name: &str) {
        if !name.trim().is_empty() {
            self.active_model = name.trim().to_string();
        }
    }

    /// Switches the model and writes it through to the settings file.
    pub fn set_model(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TermsageError::Input("model name cannot be empty".to_string()));
        }

        self.active_model = name.to_string();
        self.config.ai.model = name.to_string();
        self.config.save()
    }

    /// Turns assistance off for this session only, leaving the file alone.
    pub fn suppress_ai(&mut self) {
        self.ai_suppressed = true;
    }

    pub fn ai_enabled(&self) -> bool {
        self.config.ai.enabled && !self.ai_suppressed
    }

    pub fn conversational_mode(&self) -> bool {
        self.conversational_mode
    }

    pub fn toggle_conversation_mode(&mut self) -> bool {
        self.conversational_mode = !self.conversational_mode;
        self.conversational_mode
    }

    pub fn record_input(&mut self, line: &str) {
        if self.recent_inputs.len() == MAX_RECENT_INPUTS {
            self.recent_inputs.pop_front();
        }
        self.recent_inputs.push_back(line.to_string());
        self.input_count += 1;
    }

    pub fn recent_inputs(&self) -> &VecDeque<String> {
        &self.recent_inputs
    }

    pub fn input_count(&self) -> u64 {
        self.input_count
    }

    pub fn cache_get(&self, key: &CacheKey) -> Option<&str> {
        self.response_cache.get(key)
    }

    pub fn cache_put(&mut self, key: CacheKey, value: String) {
        self.response_cache.put(key, value);
    }

    #[cfg(test)]
    pub fn cached_responses(&self) -> usize {
        self.response_cache.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Session {
        let config = Config::with_path(dir.path().join("config.yaml"));
        Session::new(config, dir.path().to_path_buf())
    }

    #[test]
    fn recent_inputs_keep_the_last_fifty() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        for i in 1..=55 {
            session.record_input(&format!("cmd {}", i));
        }

        assert_eq!(session.recent_inputs().len(), MAX_RECENT_INPUTS);
        assert_eq!(session.recent_inputs().front().unwrap(), "cmd 6");
        assert_eq!(session.recent_inputs().back().unwrap(), "cmd 55");
        assert_eq!(session.input_count(), 55);
    }

    #[test]
    fn cache_evicts_first_inserted_key() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let key = |i: usize| CacheKey::new(&format!("cmd{}", i), dir.path());

        for i in 0..21 {
            session.cache_put(key(i), format!("help {}", i));
        }

        assert_eq!(session.cached_responses(), MAX_CACHED_RESPONSES);
        assert!(session.cache_get(&key(0)).is_none());
        for i in 1..21 {
            assert_eq!(session.cache_get(&key(i)), Some(format!("help {}", i).as_str()));
        }
    }

    #[test]
    fn cache_eviction_ignores_reads() {
        let mut cache = ResponseCache::default();
        let dir = Path::new("/tmp");
        let key = |i: usize| CacheKey::new(&format!("cmd{}", i), dir);

        for i in 0..MAX_CACHED_RESPONSES {
            cache.put(key(i), String::new());
        }
        // An LRU would now keep cmd0; insertion order does not.
        assert!(cache.get(&key(0)).is_some());
        cache.put(key(99), String::new());

        assert!(cache.get(&key(0)).is_none());
        assert!(cache.get(&key(1)).is_some());
    }

    #[test]
    fn cache_put_on_existing_key_keeps_position() {
        let mut cache = ResponseCache::default();
        let dir = Path::new("/tmp");
        let key = |i: usize| CacheKey::new(&format!("cmd{}", i), dir);

        for i in 0..MAX_CACHED_RESPONSES {
            cache.put(key(i), "old".to_string());
        }
        cache.put(key(0), "new".to_string());
        assert_eq!(cache.len(), MAX_CACHED_RESPONSES);
        assert_eq!(cache.get(&key(0)), Some("new"));

        cache.put(key(50), String::new());
        assert!(cache.get(&key(0)).is_none());
    }

    #[test]
    fn same_command_in_another_directory_is_a_different_key() {
        let a = CacheKey::new("ls", Path::new("/a"));
        let b = CacheKey::new("ls", Path::new("/b"));
        assert_ne!(a, b);
    }

    #[test]
    fn toggling_twice_restores_the_original_mode() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let original = session.conversational_mode();

        let first = session.toggle_conversation_mode();
        assert_eq!(first, session.conversational_mode());
        assert_ne!(first, original);

        let second = session.toggle_conversation_mode();
        assert_eq!(second, session.conversational_mode());
        assert_eq!(second, original);
    }

    #[test]
    fn set_model_persists_to_a_fresh_config_load() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        session.set_model("mistral:7b").unwrap();
        assert_eq!(session.active_model(), "mistral:7b");

        let reloaded = Config::load_from(dir.path().join("config.yaml"));
        assert_eq!(reloaded.ai.model, "mistral:7b");
    }

    #[test]
    fn empty_model_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        assert!(session.set_model("   ").is_err());
        assert_eq!(session.active_model(), DEFAULT_MODEL);
    }

    #[test]
    fn blank_configured_model_falls_back_to_default() {
        let mut config = Config::with_path("unused.yaml");
        config.ai.model = String::new();

        let session = Session::new(config, PathBuf::from("/"));
        assert_eq!(session.active_model(), DEFAULT_MODEL);
    }

    #[test]
    fn suppressing_ai_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        session.suppress_ai();
        session.set_model("mistral").unwrap();

        assert!(!session.ai_enabled());
        let reloaded = Config::load_from(session.config().path().to_path_buf());
        assert!(reloaded.ai.enabled);
    }
}
