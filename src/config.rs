use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_CATALOG_PATH: &str = "./skills.json";
const DEFAULT_CACHE_CAPACITY: usize = 1000;
const WORKER_THREADS: u16 = 4;

const DEFAULT_ANNOTATOR_URL: &str = "http://127.0.0.1:8090";
/// Annotation cost scales with input length; long descriptions need room.
const DEFAULT_ANNOTATOR_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the annotation sidecar.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Base URL of the sidecar (exposes /health and /annotate).
    #[serde(default = "default_annotator_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_annotator_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ANNOTATOR_URL.to_string(),
            timeout_secs: DEFAULT_ANNOTATOR_TIMEOUT_SECS,
        }
    }
}

fn default_annotator_url() -> String {
    DEFAULT_ANNOTATOR_URL.to_string()
}

fn default_annotator_timeout_secs() -> u64 {
    DEFAULT_ANNOTATOR_TIMEOUT_SECS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP service binds to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Path to the skill catalog JSON file.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Result cache capacity (entries).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Runtime worker threads; bounds concurrent annotation calls.
    #[serde(default = "worker_threads")]
    pub worker_threads: u16,

    #[serde(default)]
    pub annotator: AnnotatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            worker_threads: WORKER_THREADS,
            annotator: AnnotatorConfig::default(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_catalog_path() -> String {
    DEFAULT_CATALOG_PATH.to_string()
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn worker_threads() -> u16 {
    WORKER_THREADS
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if self.bind.is_empty() {
            bail!("bind must not be empty");
        }
        if self.catalog_path.is_empty() {
            bail!("catalog_path must not be empty");
        }
        if self.cache_capacity == 0 {
            bail!("cache_capacity must be greater than 0");
        }
        if self.worker_threads == 0 {
            bail!("worker_threads must be greater than 0");
        }
        if self.annotator.url.is_empty() {
            bail!("annotator.url must not be empty");
        }
        if self.annotator.timeout_secs == 0 {
            bail!("annotator.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Loads the config file, falling back to defaults when it does not
    /// exist. Malformed content or invalid values are startup-fatal.
    pub fn load_with(path: &str) -> anyhow::Result<Self> {
        let config = if Path::new(path).exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {path}"))?;
            serde_yml::from_str(&raw).with_context(|| format!("config file {path} is malformed"))?
        } else {
            log::debug!("config file {path} not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }
}
