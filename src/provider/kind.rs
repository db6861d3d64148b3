//! Provider kind enumeration and preference parsing.
//!
//! Defines [`ProviderKind`], which identifies an LLM backend, and
//! [`preferred_provider`], which turns the caller/environment/default
//! precedence chain into a kind.

use serde::{Deserialize, Serialize};

/// Identifies which LLM backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini.
    Google,
    /// Groq (OpenAI-compatible chat completions).
    Groq,
    /// Deterministic rule-based stub, used when nothing else can be built.
    Local,
}

impl ProviderKind {
    /// Parses an exact provider name. Matching is case-insensitive.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "google" => Some(Self::Google),
            "groq" => Some(Self::Groq),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    /// Parses a preference, sending unknown names down the Groq chain.
    pub fn from_preference(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            tracing::debug!(preference = s, "unknown provider preference, using groq chain");
            Self::Groq
        })
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Groq => "groq",
            ProviderKind::Local => "local",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Google => Some(crate::constants::GOOGLE_API_KEY_VAR),
            ProviderKind::Groq => Some(crate::constants::GROQ_API_KEY_VAR),
            ProviderKind::Local => None,
        }
    }

    /// Backends tried, in order, for this preference. The stub always
    /// follows as the last resort and is not listed.
    pub fn fallback_chain(&self) -> &'static [ProviderKind] {
        match self {
            ProviderKind::Google => &[ProviderKind::Google, ProviderKind::Groq],
            ProviderKind::Groq => &[ProviderKind::Groq],
            ProviderKind::Local => &[],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve which provider to prefer.
/// Priority: explicit argument > process-wide override > default (`google`).
pub fn preferred_provider(explicit: Option<&str>, override_: Option<&str>) -> ProviderKind {
    let name = explicit
        .or(override_)
        .unwrap_or(crate::constants::DEFAULT_PROVIDER);
    ProviderKind::from_preference(name)
}
