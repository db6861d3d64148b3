//! Backend resolution for railmate.
//!
//! Turns a provider preference into a usable [`BackendHandle`] by walking an
//! explicit, ordered list of constructors. Construction failures are logged
//! and collected, never surfaced: when every real backend fails, the local
//! stub is returned.

use std::sync::Arc;

use super::handle::BackendHandle;
use super::kind::{preferred_provider, ProviderKind};
use super::stub::LocalClassifier;
use super::{google, groq};
use crate::config::Settings;
use crate::error::ConstructionFailure;

/// Builds one backend from the settings and an optional system prompt.
pub type BackendConstructor =
    Arc<dyn Fn(&Settings, Option<&str>) -> Result<BackendHandle, ConstructionFailure> + Send + Sync>;

/// Outcome of resolution, including every backend that was skipped.
#[derive(Debug)]
pub struct Resolution {
    pub preference: ProviderKind,
    pub handle: BackendHandle,
    pub failures: Vec<ConstructionFailure>,
}

/// Resolves provider preferences into backend handles.
#[derive(Clone)]
pub struct ProviderResolver {
    settings: Arc<Settings>,
    constructors: Vec<(ProviderKind, BackendConstructor)>,
}

impl ProviderResolver {
    /// A resolver using the real Gemini and Groq constructors.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_constructors(
            settings,
            vec![
                (ProviderKind::Google, Arc::new(google::build) as BackendConstructor),
                (ProviderKind::Groq, Arc::new(groq::build) as BackendConstructor),
            ],
        )
    }

    /// A resolver with caller-supplied constructors, keyed by provider kind.
    pub fn with_constructors(
        settings: Arc<Settings>,
        constructors: Vec<(ProviderKind, BackendConstructor)>,
    ) -> Self {
        Self {
            settings,
            constructors,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The provider kind a preference resolves to, honouring the
    /// process-wide override when `preferred` is `None`.
    pub fn preference(&self, preferred: Option<&str>) -> ProviderKind {
        preferred_provider(preferred, self.settings.provider_override.as_deref())
    }

    /// Returns a usable handle for the preference. Never fails.
    #[allow(dead_code)]
    pub fn resolve(&self, preferred: Option<&str>) -> BackendHandle {
        self.resolve_detailed(preferred, None).handle
    }

    /// Like [`ProviderResolver::resolve`], also reporting skipped backends.
    ///
    /// `system_prompt` is handed to each constructor so the backend carries
    /// it on every request.
    pub fn resolve_detailed(
        &self,
        preferred: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Resolution {
        let preference = self.preference(preferred);
        let mut failures = Vec::new();

        for kind in preference.fallback_chain() {
            let Some((_, construct)) = self.constructors.iter().find(|(k, _)| k == kind) else {
                continue;
            };
            match construct(&self.settings, system_prompt) {
                Ok(handle) => {
                    tracing::debug!(%preference, backend = %kind, model = handle.model(), "resolved backend");
                    return Resolution {
                        preference,
                        handle,
                        failures,
                    };
                }
                Err(failure) => {
                    tracing::warn!(%preference, backend = %kind, reason = %failure.reason, "backend unavailable, falling back");
                    failures.push(failure);
                }
            }
        }

        tracing::info!(%preference, "using local stub backend");
        Resolution {
            preference,
            handle: LocalClassifier::handle(),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn failing(kind: ProviderKind) -> BackendConstructor {
        Arc::new(move |_: &Settings, _: Option<&str>| Err(ConstructionFailure::new(kind, "no credentials")))
    }

    fn succeeding(kind: ProviderKind, calls: Arc<AtomicUsize>) -> BackendConstructor {
        Arc::new(move |_: &Settings, _: Option<&str>| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(BackendHandle::new(kind, format!("{kind}-model")))
        })
    }

    fn settings() -> Arc<Settings> {
        Arc::new(Settings::new("g", "q"))
    }

    #[test]
    fn google_failure_falls_through_to_groq() {
        let groq_calls = Arc::new(AtomicUsize::new(0));
        let resolver = ProviderResolver::with_constructors(
            settings(),
            vec![
                (ProviderKind::Google, failing(ProviderKind::Google)),
                (ProviderKind::Groq, succeeding(ProviderKind::Groq, groq_calls.clone())),
            ],
        );

        let resolution = resolver.resolve_detailed(Some("google"), None);
        assert_eq!(resolution.handle.provider(), ProviderKind::Groq);
        assert_eq!(resolution.failures.len(), 1);
        assert_eq!(resolution.failures[0].provider, ProviderKind::Google);
        assert_eq!(groq_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn all_failures_yield_usable_stub() {
        let resolver = ProviderResolver::with_constructors(
            settings(),
            vec![
                (ProviderKind::Google, failing(ProviderKind::Google)),
                (ProviderKind::Groq, failing(ProviderKind::Groq)),
            ],
        );

        let resolution = resolver.resolve_detailed(Some("GOOGLE"), None);
        let handle = resolution.handle;
        assert_eq!(handle.provider(), ProviderKind::Local);
        assert!(handle.direct().is_some());
        assert!(handle.generative().is_some());
        assert!(handle.client().is_some());
        assert_eq!(resolution.failures.len(), 2);
    }

    #[test]
    fn groq_preference_never_tries_google() {
        let google_calls = Arc::new(AtomicUsize::new(0));
        let resolver = ProviderResolver::with_constructors(
            settings(),
            vec![
                (ProviderKind::Google, succeeding(ProviderKind::Google, google_calls.clone())),
                (ProviderKind::Groq, failing(ProviderKind::Groq)),
            ],
        );

        let handle = resolver.resolve(Some("groq"));
        assert_eq!(handle.provider(), ProviderKind::Local);
        assert_eq!(google_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn override_applies_only_without_explicit_preference() {
        let mut s = Settings::new("g", "q");
        s.provider_override = Some("groq".into());
        let resolver = ProviderResolver::with_constructors(Arc::new(s), vec![]);
        assert_eq!(resolver.preference(None), ProviderKind::Groq);
        assert_eq!(resolver.preference(Some("google")), ProviderKind::Google);
    }

    #[test]
    fn default_preference_is_google() {
        let resolver = ProviderResolver::with_constructors(settings(), vec![]);
        assert_eq!(resolver.preference(None), ProviderKind::Google);
    }

    #[test]
    fn local_preference_goes_straight_to_stub() {
        let resolver = ProviderResolver::new(settings());
        let resolution = resolver.resolve_detailed(Some("local"), None);
        assert_eq!(resolution.handle.provider(), ProviderKind::Local);
        assert!(resolution.failures.is_empty());
    }

    #[test]
    fn disabled_real_backends_fall_back_to_stub() {
        let mut s = Settings::new("g", "q");
        s.google.enabled = false;
        s.groq.enabled = false;
        let resolver = ProviderResolver::new(Arc::new(s));
        let resolution = resolver.resolve_detailed(Some("google"), None);
        assert_eq!(resolution.handle.provider(), ProviderKind::Local);
        assert_eq!(resolution.failures.len(), 2);
    }
}
