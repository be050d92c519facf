//! TOML-based configuration for Concierge
//!
//! This module provides declarative configuration for the server, the support
//! API client, LLM and embedding providers, RAG parameters and chat defaults
//! via a TOML file (`concierge.toml`).
//!
//! Every field has a default, so a missing file yields a working local setup
//! (Ollama on `localhost:11434`, support API on `localhost:8000`).
//!
//! # Hot Reloading
//!
//! Configuration changes are automatically detected and applied at runtime.
//! Use `ConfigManager` for thread-safe access to the current configuration.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from concierge.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConciergeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub support_api: SupportApiConfig,

    #[serde(default)]
    pub llm: ProviderConfig,

    #[serde(default)]
    pub embeddings: EmbeddingConfig,

    #[serde(default)]
    pub rag: RagConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Maximum request body size for document uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Parent directory for scratch copies of uploads; the system temp
    /// directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            max_upload_bytes: default_max_upload_bytes(),
            upload_dir: None,
        }
    }
}

// ============= Support API Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportApiConfig {
    /// Base URL the chat agents use to reach the complaints/orders/escalations API
    #[serde(default = "default_support_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_support_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SupportApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_support_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
        /// Local generation can be slow, so the default is generous
        #[serde(default = "default_ollama_timeout_secs")]
        timeout_secs: u64,
    },
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        model: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmbeddingConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_embedding_model")]
        model: String,
        #[serde(default = "default_ollama_timeout_secs")]
        timeout_secs: u64,
    },
    OpenAI {
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_embedding_model")]
        model: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_ollama_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_embedding_model(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

// ============= RAG Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// CSV file of store questions and answers backing the FAQ agent
    #[serde(default = "default_faq_path")]
    pub faq_path: PathBuf,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    3
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("data/store_qa.csv")
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            faq_path: default_faq_path(),
        }
    }
}

// ============= Chat Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Order id used for complaint and tracking requests that don't carry one.
    /// An empty string turns the fallback off.
    #[serde(
        default = "default_order_id",
        deserialize_with = "deserialize_order_id",
        serialize_with = "serialize_order_id"
    )]
    pub default_order_id: Option<String>,

    /// Number of recent messages kept per session
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Sessions kept in memory; the least recently active one is dropped
    /// when a new session would exceed this
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_order_id() -> Option<String> {
    Some("ORD123".to_string())
}

fn deserialize_order_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let id = String::deserialize(deserializer)?;
    let id = id.trim();
    Ok((!id.is_empty()).then(|| id.to_string()))
}

fn serialize_order_id<S>(id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(id.as_deref().unwrap_or_default())
}

fn default_history_window() -> usize {
    50
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_order_id: default_order_id(),
            history_window: default_history_window(),
            max_sessions: default_max_sessions(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl ConciergeConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(
                "Configuration file {:?} not found, using defaults",
                path
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ConciergeConfig = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Validate ranges and cross-field constraints.
    ///
    /// Environment variables are not checked here; see [`Self::validate_env`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "rag.top_k must be greater than 0".to_string(),
            ));
        }
        if self.support_api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "support_api.base_url must not be empty".to_string(),
            ));
        }
        if self.chat.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "chat.history_window must be greater than 0".to_string(),
            ));
        }
        if self.chat.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "chat.max_sessions must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Check that every environment variable the config references is set.
    pub fn validate_env(&self) -> Result<(), ConfigError> {
        if let ProviderConfig::OpenAI { api_key_env, .. } = &self.llm {
            self.resolve_env(api_key_env)?;
        }
        if let EmbeddingConfig::OpenAI { api_key_env, .. } = &self.embeddings {
            self.resolve_env(api_key_env)?;
        }
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Result<String, ConfigError> {
        std::env::var(env_name).map_err(|_| ConfigError::MissingEnvVar(env_name.to_string()))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct ConfigManager {
    config: Arc<ArcSwap<ConciergeConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
}

impl ConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Convert to absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let config = ConciergeConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
        })
    }

    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: ConciergeConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("test-config.toml"),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<ConciergeConfig> {
        self.config.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = ConciergeConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes.
    ///
    /// Only the values read per request (chat defaults, RAG parameters used by
    /// new document loads) pick up changes; listeners and clients built at
    /// startup keep their settings.
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Watch the config file's parent directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let mut last_reload = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.elapsed() < debounce_duration {
                    continue;
                }

                // Wait a bit for file write to complete
                tokio::time::sleep(Duration::from_millis(100)).await;

                match ConciergeConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = std::time::Instant::now();
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"
log_format = "json"

[support_api]
base_url = "http://localhost:9000"
timeout_secs = 5

[llm]
type = "openai"
api_key_env = "TEST_OPENAI_KEY"
api_base = "https://generativelanguage.googleapis.com/v1beta/openai"
model = "gemini-2.0-flash-001"

[embeddings]
type = "ollama"
model = "nomic-embed-text"

[rag]
chunk_size = 500
chunk_overlap = 50
top_k = 4
faq_path = "faq.csv"

[chat]
default_order_id = "ORD456"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config: ConciergeConfig = toml::from_str(&create_test_config()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.support_api.timeout_secs, 5);
        assert!(matches!(
            config.llm,
            ProviderConfig::OpenAI { ref model, .. } if model == "gemini-2.0-flash-001"
        ));
        assert_eq!(
            config.embeddings,
            EmbeddingConfig::Ollama {
                base_url: "http://localhost:11434".to_string(),
                model: "nomic-embed-text".to_string(),
                timeout_secs: 120,
            }
        );
        assert_eq!(config.rag.top_k, 4);
        assert_eq!(config.chat.default_order_id.as_deref(), Some("ORD456"));
        assert_eq!(config.chat.history_window, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: ConciergeConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.support_api.base_url, "http://localhost:8000");
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.chunk_overlap, 200);
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.chat.default_order_id.as_deref(), Some("ORD123"));
        assert!(matches!(config.llm, ProviderConfig::Ollama { .. }));
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_ollama_timeout_configurable() {
        let config: ConciergeConfig =
            toml::from_str("[llm]\ntype = \"ollama\"\ntimeout_secs = 15\n").unwrap();
        assert!(matches!(
            config.llm,
            ProviderConfig::Ollama { timeout_secs: 15, .. }
        ));

        let defaults = ConciergeConfig::default();
        assert!(matches!(
            defaults.llm,
            ProviderConfig::Ollama { timeout_secs: 120, .. }
        ));
        assert!(matches!(
            defaults.embeddings,
            EmbeddingConfig::Ollama { timeout_secs: 120, .. }
        ));
    }

    #[test]
    fn test_empty_default_order_id_disables_fallback() {
        let config: ConciergeConfig =
            toml::from_str("[chat]\ndefault_order_id = \"\"\n").unwrap();
        assert_eq!(config.chat.default_order_id, None);

        let rendered = config.to_toml().unwrap();
        let parsed: ConciergeConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.chat.default_order_id, None);

        let config: ConciergeConfig = toml::from_str("[chat]\nhistory_window = 10\n").unwrap();
        assert_eq!(config.chat.default_order_id.as_deref(), Some("ORD123"));
    }

    #[test]
    fn test_validation_overlap_not_smaller_than_chunk() {
        let mut config = ConciergeConfig::default();
        config.rag.chunk_overlap = config.rag.chunk_size;

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_zero_top_k() {
        let mut config = ConciergeConfig::default();
        config.rag.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_max_sessions() {
        let config: ConciergeConfig = toml::from_str("[chat]\nmax_sessions = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
        assert_eq!(ConciergeConfig::default().chat.max_sessions, 10_000);
    }

    #[test]
    fn test_validate_env_reports_missing_key() {
        let config = ConciergeConfig {
            llm: ProviderConfig::OpenAI {
                api_key_env: "CONCIERGE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
                api_base: default_openai_base(),
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 30,
            },
            ..Default::default()
        };

        match config.validate_env() {
            Err(ConfigError::MissingEnvVar(name)) => {
                assert_eq!(name, "CONCIERGE_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("expected MissingEnvVar, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConciergeConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_manager_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concierge.toml");
        fs::write(&path, "[server]\nport = 8100\n").unwrap();

        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.config().server.port, 8100);

        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 8200").unwrap();
        drop(file);

        manager.reload().unwrap();
        assert_eq!(manager.config().server.port, 8200);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = ConciergeConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: ConciergeConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.llm, config.llm);
    }
}
