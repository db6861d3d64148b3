//! Configuration types and path resolution for railmate.
//!
//! Settings live as TOML at the platform's XDG config path
//! (e.g. `~/.config/railmate/config.toml` on Linux), optionally overlaid by a
//! project `railmate.toml`. API keys normally come from the environment.

mod loader;
mod paths;
mod resolve;
mod settings;
mod types;

pub use settings::{BackendSettings, Settings};
pub use types::Config;
#[allow(unused_imports)]
pub use types::{ProviderConfig, ProviderEntry};

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}
