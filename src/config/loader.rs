//! File loading and merging for railmate configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{Config, ProviderConfig, ProviderEntry};

impl Config {
    /// Loads the global config from `~/.config/railmate/config.toml`.
    ///
    /// A missing file is not an error: defaults are returned and API keys
    /// are expected in the environment.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no global config, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Look for railmate.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                return Self::from_file(&candidate).map(Some);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parses a single TOML config file.
    pub(super) fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            default_provider: project.default_provider.or(global.default_provider),
            provider: ProviderConfig {
                google: ProviderEntry::merge(global.provider.google, project.provider.google),
                groq: ProviderEntry::merge(global.provider.groq, project.provider.groq),
            },
            transcript_dir: project.transcript_dir.or(global.transcript_dir),
            max_retries: project.max_retries.or(global.max_retries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_wins_field_by_field() {
        let global: Config = toml::from_str(
            r#"
default_provider = "google"
max_retries = 5

[provider.groq]
api_key = "global-key"
model = "llama-global"
"#,
        )
        .unwrap();
        let project: Config = toml::from_str(
            r#"
default_provider = "groq"

[provider.groq]
model = "llama-project"
enabled = false
"#,
        )
        .unwrap();

        let merged = Config::merge(global, project);
        assert_eq!(merged.default_provider.as_deref(), Some("groq"));
        assert_eq!(merged.max_retries, Some(5));
        let groq = merged.provider.groq.unwrap();
        assert_eq!(groq.api_key.as_deref(), Some("global-key"));
        assert_eq!(groq.model.as_deref(), Some("llama-project"));
        assert_eq!(groq.enabled, Some(false));
        assert!(merged.provider.google.is_none());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("railmate.toml");
        fs::write(&path, "transcript_dir = \"logs\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.transcript_dir.as_deref(), Some("logs"));
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("railmate.toml");
        fs::write(&path, "max_retries = \"three\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
