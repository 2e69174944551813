//! Tracing bootstrap for processes embedding the pipeline.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Quiet default: pipeline summaries at info, per-step chatter hidden.
pub const DEFAULT_FILTER: &str = "info,artwork::scan=info,artwork::registry=info,scheduler=info";

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `default_filter`. Fails if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
