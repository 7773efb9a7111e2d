//! Tracing subscriber setup

use anyhow::anyhow;
use tracing_subscriber::{fmt, EnvFilter};

/// Level used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr
///
/// `format` is `"json"` for one JSON object per event, anything else for
/// human-readable text.
pub(crate) fn init(format: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let installed = match format {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
