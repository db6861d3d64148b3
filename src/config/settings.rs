//! Immutable runtime settings validated once at startup.
//!
//! [`Settings`] is what the provider resolver and dispatcher read. It is
//! built from the merged [`Config`] plus the environment, and fails fast
//! when a required API key is missing.

use std::path::PathBuf;

use super::types::Config;
use crate::constants;
use crate::error::ConfigError;
use crate::provider::ProviderKind;

/// Everything needed to build one backend.
#[derive(Clone)]
pub struct BackendSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub base_url: Option<String>,
    pub enabled: bool,
    /// Internal HTTP retries for clients that support them.
    pub max_retries: u32,
}

impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("api_key", &"********")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("enabled", &self.enabled)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Process-wide, read-only settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub google: BackendSettings,
    pub groq: BackendSettings,
    /// Preference used when a caller passes none.
    pub provider_override: Option<String>,
    pub transcript_dir: PathBuf,
    pub max_retries: u32,
}

impl Settings {
    /// Settings with built-in defaults and the given keys.
    pub fn new(google_api_key: impl Into<String>, groq_api_key: impl Into<String>) -> Self {
        Self {
            google: BackendSettings {
                api_key: google_api_key.into(),
                model: constants::GOOGLE_MODEL.to_string(),
                temperature: constants::GOOGLE_TEMPERATURE,
                base_url: None,
                enabled: true,
                max_retries: 0,
            },
            groq: BackendSettings {
                api_key: groq_api_key.into(),
                model: constants::GROQ_MODEL.to_string(),
                temperature: constants::GROQ_TEMPERATURE,
                base_url: None,
                enabled: true,
                max_retries: constants::GROQ_MAX_RETRIES,
            },
            provider_override: None,
            transcript_dir: PathBuf::from(constants::DEFAULT_TRANSCRIPT_DIR),
            max_retries: constants::DEFAULT_MAX_RETRIES,
        }
    }

    /// Validates the merged config into settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if either provider key is absent.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::build(
            config,
            config.resolve_api_key(ProviderKind::Google),
            config.resolve_api_key(ProviderKind::Groq),
            config.provider_override(),
        )
    }

    fn build(
        config: &Config,
        google_key: Option<String>,
        groq_key: Option<String>,
        provider_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let google_key = google_key.ok_or(ConfigError::MissingSecret {
            var: constants::GOOGLE_API_KEY_VAR,
        })?;
        let groq_key = groq_key.ok_or(ConfigError::MissingSecret {
            var: constants::GROQ_API_KEY_VAR,
        })?;

        let mut settings = Self::new(google_key, groq_key);
        settings.provider_override = provider_override;
        for (kind, backend) in [
            (ProviderKind::Google, &mut settings.google),
            (ProviderKind::Groq, &mut settings.groq),
        ] {
            let Some(entry) = config.entry(kind) else {
                continue;
            };
            if let Some(ref model) = entry.model {
                backend.model = model.clone();
            }
            if let Some(temperature) = entry.temperature {
                backend.temperature = temperature;
            }
            backend.base_url = entry.base_url.clone().filter(|u| !u.is_empty());
            backend.enabled = entry.enabled.unwrap_or(true);
        }
        if let Some(ref dir) = config.transcript_dir {
            settings.transcript_dir = PathBuf::from(dir);
        }
        if let Some(max_retries) = config.max_retries {
            settings.max_retries = max_retries;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderConfig, ProviderEntry};

    #[test]
    fn missing_google_key_is_fatal() {
        let err = Settings::build(&Config::default(), None, Some("g".into()), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSecret {
                var: "GOOGLE_API_KEY"
            }
        ));
    }

    #[test]
    fn missing_groq_key_is_fatal() {
        let err = Settings::build(&Config::default(), Some("k".into()), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GROQ_API_KEY not found in environment; check .env and spelling"
        );
    }

    #[test]
    fn defaults_match_provider_constants() {
        let settings = Settings::new("g", "q");
        assert_eq!(settings.google.model, "gemini-2.0-flash");
        assert_eq!(settings.google.temperature, 0.3);
        assert_eq!(settings.groq.model, "llama-3.3-70b-versatile");
        assert_eq!(settings.groq.temperature, 0.0);
        assert_eq!(settings.groq.max_retries, 3);
        assert_eq!(settings.max_retries, 3);
    }

    #[test]
    fn config_entries_override_defaults() {
        let config = Config {
            provider: ProviderConfig {
                google: Some(ProviderEntry {
                    model: Some("gemini-custom".into()),
                    enabled: Some(false),
                    ..Default::default()
                }),
                groq: None,
            },
            transcript_dir: Some("transcripts".into()),
            max_retries: Some(5),
            ..Default::default()
        };
        let settings = Settings::build(
            &config,
            Some("g".into()),
            Some("q".into()),
            Some("groq".into()),
        )
        .unwrap();
        assert_eq!(settings.google.model, "gemini-custom");
        assert!(!settings.google.enabled);
        assert!(settings.groq.enabled);
        assert_eq!(settings.transcript_dir, PathBuf::from("transcripts"));
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.provider_override.as_deref(), Some("groq"));
    }

    #[test]
    fn debug_output_hides_keys() {
        let settings = Settings::new("very-secret", "also-secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("also-secret"));
    }
}
