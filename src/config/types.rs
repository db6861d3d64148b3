//! Struct definitions and serde defaults for railmate configuration.

use serde::{Deserialize, Serialize};

/// Root configuration, deserialized from `config.toml` / `railmate.toml`.
///
/// Every field is optional so railmate runs with sensible defaults when no
/// config file exists; API keys usually come from the environment.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Default provider name (`google`, `groq`, `local`).
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Directory transcripts are written to.
    #[serde(default)]
    pub transcript_dir: Option<String>,
    /// Attempts `llm_chat` makes before giving up.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

/// Provider-specific configuration map.
///
/// Only providers the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    /// Google Gemini.
    pub google: Option<ProviderEntry>,
    /// Groq.
    pub groq: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProviderEntry {
    /// API key. The matching environment variable takes precedence.
    pub api_key: Option<String>,
    /// Custom base URL (proxies, self-hosted gateways).
    pub base_url: Option<String>,
    /// Model identifier overriding the built-in default.
    pub model: Option<String>,
    /// Sampling temperature overriding the built-in default.
    pub temperature: Option<f64>,
    /// Set to `false` to skip this backend during resolution.
    pub enabled: Option<bool>,
}

impl ProviderEntry {
    /// Field-wise merge where `over` wins when present.
    pub(super) fn merge(base: Option<Self>, over: Option<Self>) -> Option<Self> {
        match (base, over) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(Self {
                api_key: o.api_key.or(b.api_key),
                base_url: o.base_url.or(b.base_url),
                model: o.model.or(b.model),
                temperature: o.temperature.or(b.temperature),
                enabled: o.enabled.or(b.enabled),
            }),
        }
    }
}
