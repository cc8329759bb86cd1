use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub emotion: EmotionConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub websearch: WebSearchConfig,
}

/// Postgres connection settings. The password never lives in the config
/// file: it is read from `PG_PASSWORD`, and the whole URL can be
/// overridden with `DATABASE_URL`.
#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    pub dbname: String,
    pub user: String,
}

fn default_pg_port() -> u16 {
    5432
}

impl DbConfig {
    /// Resolve the connection URL, preferring `DATABASE_URL` when set.
    pub fn url(&self) -> Result<String> {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                return Ok(url);
            }
        }
        let password = std::env::var("PG_PASSWORD")
            .context("PG_PASSWORD environment variable not set (and no DATABASE_URL)")?;
        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, password, self.host, self.port, self.dbname
        ))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            embedding_model: default_embedding_model(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_embedding_model() -> String {
    "models/embedding-001".to_string()
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptionConfig {
    #[serde(default = "default_transcription_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: default_transcription_url(),
            poll_interval_secs: default_poll_interval_secs(),
            max_polls: default_max_polls(),
            timeout_secs: default_upload_timeout_secs(),
        }
    }
}

fn default_transcription_url() -> String {
    "https://api.assemblyai.com/v2".to_string()
}
fn default_poll_interval_secs() -> u64 {
    3
}
fn default_max_polls() -> u32 {
    100
}
fn default_upload_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmotionConfig {
    #[serde(default = "default_emotion_url")]
    pub url: String,
    /// Seconds between sampled video frames.
    #[serde(default = "default_frame_interval_secs")]
    pub frame_interval_secs: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            url: default_emotion_url(),
            frame_interval_secs: default_frame_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_emotion_url() -> String {
    "https://api.luxand.cloud/photo/emotions".to_string()
}
fn default_frame_interval_secs() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    1200
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: i64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> i64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebSearchConfig {
    #[serde(default = "default_websearch_url")]
    pub url: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            url: default_websearch_url(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_websearch_url() -> String {
    "https://api.duckduckgo.com".to_string()
}
fn default_max_results() -> usize {
    5
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if config.emotion.frame_interval_secs <= 0.0 {
        anyhow::bail!("emotion.frame_interval_secs must be > 0");
    }

    if config.transcription.max_polls == 0 {
        anyhow::bail!("transcription.max_polls must be >= 1");
    }

    Ok(config)
}
