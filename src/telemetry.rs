//! Tracing setup. Logs go to stderr so command output on stdout stays clean.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Installs the global subscriber once. `RUST_LOG` overrides the default
/// filter; `verbose` raises the default to debug.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_this_crate() {
        assert_eq!(default_directives(false), "railmate=info");
        assert_eq!(default_directives(true), "railmate=debug");
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing(false);
        init_tracing(true);
    }
}
