/*!
 * Application configuration.
 *
 * This module handles the application configuration including loading,
 * validating and saving configuration settings.
 */

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, as an ISO code or a language name
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How the request prompt is laid out
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Guideline turn, assistant acknowledgment, then the payload; asks for a
    /// direct and an improved translation in a structured reply
    #[default]
    TwoPass,
    /// Single user message rendered from `user_template`
    Template,
}

/// Prompt templates
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PromptConfig {
    /// Prompt layout
    #[serde(default)]
    pub style: PromptStyle,

    /// User message template
    /// Placeholders: {text}, {language}, {crlf}
    #[serde(default)]
    pub user_template: Option<String>,

    /// System message template
    /// Placeholders: {language}, {crlf}
    #[serde(default)]
    pub system_template: Option<String>,
}

/// Model-family routing by estimated prompt size
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelRouting {
    /// Model used for prompts at or under the threshold
    #[serde(default = "default_standard_model")]
    pub standard_model: String,

    /// Model used for prompts over the threshold
    #[serde(default = "default_long_context_model")]
    pub long_context_model: String,

    /// Estimated prompt tokens above which the long-context model is used
    #[serde(default = "default_token_threshold")]
    pub token_threshold: usize,

    /// Model whose tokenizer is used for estimation
    #[serde(default = "default_standard_model")]
    pub tokenizer_model: String,
}

impl Default for ModelRouting {
    fn default() -> Self {
        Self {
            standard_model: default_standard_model(),
            long_context_model: default_long_context_model(),
            token_threshold: default_token_threshold(),
            tokenizer_model: default_standard_model(),
        }
    }
}

/// Retry and pacing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Attempts per remote call before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Rate-limit window shared by the credential pool, in seconds.
    /// The pause after a transient failure is `rate_window_secs / pool size`.
    #[serde(default = "default_rate_window_secs")]
    pub rate_window_secs: u64,

    /// Re-translations allowed while the segment count mismatches
    #[serde(default = "default_alignment_retries")]
    pub alignment_retries: usize,

    /// Pause before each alignment re-translation, in seconds
    #[serde(default = "default_alignment_retry_delay_secs")]
    pub alignment_retry_delay_secs: u64,

    /// Optional deadline for a whole batch, in seconds
    #[serde(default)]
    pub batch_timeout_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            rate_window_secs: default_rate_window_secs(),
            alignment_retries: default_alignment_retries(),
            alignment_retry_delay_secs: default_alignment_retry_delay_secs(),
            batch_timeout_secs: None,
        }
    }
}

/// Price of one model tier, per million tokens
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ModelRate {
    pub prompt_per_million: f64,
    pub completion_per_million: f64,
}

/// Pricing of both model tiers
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    #[serde(default = "default_standard_rate")]
    pub standard: ModelRate,

    #[serde(default = "default_long_context_rate")]
    pub long_context: ModelRate,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard: default_standard_rate(),
            long_context: default_long_context_rate(),
        }
    }
}

/// Where diagnostic records are written
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiagnosticsConfig {
    /// Directory holding `buglog.txt` and `long_text.txt`
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { log_dir: default_log_dir() }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Credential pool, rotated on every attempt.
    /// Accepts a list or a single comma-separated string.
    #[serde(default, deserialize_with = "deserialize_api_keys")]
    pub api_keys: Vec<String>,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Private deployment id; when set, model routing is bypassed
    #[serde(default)]
    pub deployment_id: Option<String>,

    /// API version for private deployments
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Temperature parameter for text generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of batches in flight
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Paragraphs per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub routing: ModelRouting,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            endpoint: default_endpoint(),
            deployment_id: None,
            api_version: default_api_version(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
            batch_size: default_batch_size(),
            routing: ModelRouting::default(),
            prompt: PromptConfig::default(),
            retry: RetryConfig::default(),
            pricing: PricingConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Environment variable overriding the user prompt template
pub const USER_TEMPLATE_ENV: &str = "PARATRANS_USER_MSG_TEMPLATE";
/// Environment variable overriding the system prompt template
pub const SYSTEM_TEMPLATE_ENV: &str = "PARATRANS_SYS_MSG";
/// Environment variable holding comma-separated API keys
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiKeys {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_api_keys<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ApiKeys::deserialize(deserializer)? {
        ApiKeys::List(keys) => keys.into_iter().flat_map(|k| split_keys(&k)).collect(),
        ApiKeys::Joined(joined) => split_keys(&joined),
    })
}

/// Split a comma-separated key list, dropping blanks
pub fn split_keys(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_target_language() -> String {
    "zh-hans".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_version() -> String {
    "2023-03-15-preview".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_batch_size() -> usize {
    10
}

fn default_standard_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_long_context_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}

fn default_token_threshold() -> usize {
    1200
}

fn default_max_attempts() -> usize {
    3
}

fn default_rate_window_secs() -> u64 {
    60 // per-minute rate budget shared by the pool
}

fn default_alignment_retries() -> usize {
    15
}

fn default_alignment_retry_delay_secs() -> u64 {
    6
}

fn default_standard_rate() -> ModelRate {
    ModelRate { prompt_per_million: 1.5, completion_per_million: 2.0 }
}

fn default_long_context_rate() -> ModelRate {
    ModelRate { prompt_per_million: 3.0, completion_per_million: 4.0 }
}

fn default_log_dir() -> String {
    "log".to_string()
}

impl Config {
    /// Load a configuration file, creating it with defaults if missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            log::warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
            Ok(config)
        }
    }

    /// Fill unset templates and credentials from the environment
    ///
    /// `lookup` is normally `|k| std::env::var(k).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let prompt = &mut self.translation.prompt;
        if prompt.user_template.is_none() {
            prompt.user_template = lookup(USER_TEMPLATE_ENV).filter(|t| !t.is_empty());
        }
        if prompt.system_template.is_none() {
            prompt.system_template = lookup(SYSTEM_TEMPLATE_ENV).filter(|t| !t.is_empty());
        }
        if self.translation.api_keys.is_empty() {
            if let Some(joined) = lookup(API_KEY_ENV) {
                self.translation.api_keys = split_keys(&joined);
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;
        self.translation.validate()
    }
}

impl TranslationConfig {
    /// Validate the translation settings
    pub fn validate(&self) -> Result<()> {
        if self.api_keys.is_empty() {
            return Err(anyhow!("At least one API key is required (config `api_keys` or {})", API_KEY_ENV));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0, got {}", self.temperature));
        }
        if self.retry.max_attempts == 0 {
            return Err(anyhow!("retry.max_attempts must be at least 1"));
        }
        if self.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }
        if let Some(template) = &self.prompt.user_template {
            if !template.contains("{text}") {
                return Err(anyhow!("User prompt template must contain a {{text}} placeholder"));
            }
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
