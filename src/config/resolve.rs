//! Environment variable substitution and API key resolution.

use super::types::{Config, ProviderEntry};
use crate::provider::ProviderKind;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        if let Some(ref mut dir) = self.transcript_dir {
            *dir = Self::resolve_str(dir);
        }
        Self::resolve_provider_entry(&mut self.provider.google);
        Self::resolve_provider_entry(&mut self.provider.groq);
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
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

    /// Returns the config entry for a provider, if any.
    pub fn entry(&self, provider: ProviderKind) -> Option<&ProviderEntry> {
        match provider {
            ProviderKind::Google => self.provider.google.as_ref(),
            ProviderKind::Groq => self.provider.groq.as_ref(),
            ProviderKind::Local => None,
        }
    }

    /// Resolve API key for a provider: env var first, then config value.
    ///
    /// Values are trimmed; blank values count as absent.
    pub fn resolve_api_key(&self, provider: ProviderKind) -> Option<String> {
        self.resolve_api_key_with(provider, |var| std::env::var(var).ok())
    }

    pub(super) fn resolve_api_key_with(
        &self,
        provider: ProviderKind,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        let from_env = provider
            .api_key_var()
            .and_then(|var| env(var))
            .filter(|key| !key.trim().is_empty());
        from_env
            .or_else(|| self.entry(provider).and_then(|e| e.api_key.clone()))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Provider override: `LLM_PROVIDER` first, then `default_provider`.
    pub fn provider_override(&self) -> Option<String> {
        self.provider_override_with(|var| std::env::var(var).ok())
    }

    pub(super) fn provider_override_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        env(crate::constants::PROVIDER_OVERRIDE_VAR)
            .or_else(|| self.default_provider.clone())
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
    }

    /// A copy safe to print: API keys are masked.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        for entry in [&mut copy.provider.google, &mut copy.provider.groq]
            .into_iter()
            .flatten()
        {
            if entry.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
                entry.api_key = Some("********".to_string());
            }
        }
        copy
    }
}
