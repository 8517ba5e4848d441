//! Configuration loading and collaborator factories.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use flashnotes_core::error::FallthroughPolicy;
use flashnotes_core::traits::{FlashcardStore, TextGenerator};

use crate::huggingface::{
    HuggingFaceGenerator, HuggingFaceSettings, DEFAULT_BASE_URL, DEFAULT_MAX_NEW_TOKENS,
    DEFAULT_MODELS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use crate::memory::MemoryStore;
use crate::supabase::{SupabaseStore, DEFAULT_TABLE};

/// Remote generation settings.
///
/// Note: Custom Debug impl masks the API token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    /// Candidate models, tried in order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Per-candidate request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub fallthrough: FallthroughPolicy,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("models", &self.models)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("fallthrough", &self.fallthrough)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            models: default_models(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            fallthrough: FallthroughPolicy::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}
fn default_max_new_tokens() -> u32 {
    DEFAULT_MAX_NEW_TOKENS
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Flashcard store settings. Without both URL and key, cards are kept in memory.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &self.supabase_key.as_ref().map(|_| "***"))
            .field("table", &self.table)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `index.html` and other frontend assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend")
}

/// Top-level flashnotes configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashnotesConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in an optional setting; blank results count as unset.
fn resolve_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(resolve_env_vars)
        .filter(|v| !v.trim().is_empty())
}

fn resolve_config(config: &mut FlashnotesConfig) {
    config.generation.base_url = resolve_env_vars(&config.generation.base_url);
    config.generation.api_token = resolve_optional(&config.generation.api_token);
    config.store.supabase_url = resolve_optional(&config.store.supabase_url);
    config.store.supabase_key = resolve_optional(&config.store.supabase_key);
}

/// Apply `HF_API_TOKEN`, `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `PORT`.
fn apply_env_overrides(
    config: &mut FlashnotesConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = lookup("HF_API_TOKEN") {
        config.generation.api_token = Some(token);
    }
    if let Some(url) = lookup("SUPABASE_URL") {
        config.store.supabase_url = Some(url);
    }
    if let Some(key) = lookup("SUPABASE_ANON_KEY") {
        config.store.supabase_key = Some(key);
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("invalid PORT value: '{port}'"))?;
    }
    Ok(())
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `flashnotes.toml` in the current directory
/// 2. `~/.config/flashnotes/config.toml`
///
/// Environment variable overrides: `HF_API_TOKEN`, `SUPABASE_URL`,
/// `SUPABASE_ANON_KEY`, `PORT`.
pub fn load_config() -> Result<FlashnotesConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<FlashnotesConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("flashnotes.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<FlashnotesConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => FlashnotesConfig::default(),
    };

    resolve_config(&mut config);
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("flashnotes"))
}

/// Create the remote text generator from its configuration.
pub fn create_generator(config: &GenerationConfig) -> Result<Box<dyn TextGenerator>> {
    anyhow::ensure!(
        !config.models.is_empty(),
        "generation.models must list at least one candidate model"
    );
    anyhow::ensure!(config.timeout_secs > 0, "generation.timeout_secs must be positive");

    let generator = HuggingFaceGenerator::new(HuggingFaceSettings {
        base_url: config.base_url.clone(),
        api_token: config.api_token.clone(),
        models: config.models.clone(),
        max_new_tokens: config.max_new_tokens,
        temperature: config.temperature,
        timeout_secs: config.timeout_secs,
        fallthrough: config.fallthrough,
    })?;
    Ok(Box::new(generator))
}

/// Create the flashcard store. Falls back to an in-memory store when
/// Supabase is not configured.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn FlashcardStore>> {
    match (&config.supabase_url, &config.supabase_key) {
        (Some(url), Some(key)) => Ok(Box::new(SupabaseStore::new(
            url,
            key,
            Some(config.table.clone()),
        )?)),
        _ => {
            warn!("Supabase is not configured; flashcards are kept in memory only");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}
