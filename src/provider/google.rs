//! Google Gemini backend.

use std::sync::Arc;

use super::client::RigBackend;
use super::handle::{BackendHandle, Capability};
use super::kind::ProviderKind;
use crate::config::Settings;
use crate::error::ConstructionFailure;

/// Builds the Gemini handle: direct and generate capabilities via rig-core.
pub fn build(
    settings: &Settings,
    system_prompt: Option<&str>,
) -> Result<BackendHandle, ConstructionFailure> {
    let backend = &settings.google;
    if !backend.enabled {
        return Err(ConstructionFailure::new(
            ProviderKind::Google,
            "disabled in config",
        ));
    }

    let rig = RigBackend::new(ProviderKind::Google, backend, system_prompt)
        .map_err(|e| ConstructionFailure::new(ProviderKind::Google, format!("{e:#}")))?;
    let rig = Arc::new(rig);

    Ok(BackendHandle::new(ProviderKind::Google, &backend.model)
        .with(Capability::DirectCallable(rig.clone()))
        .with(Capability::Generative(rig)))
}
