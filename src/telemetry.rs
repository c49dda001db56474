//! Tracing subscribers. Both honour `RUST_LOG` when it is set.

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

const DEFAULT_DBG_FILTER: &str = "waitlist_api=debug,tower_http=debug,sqlx=info";
const DEFAULT_PRODUCTION_FILTER: &str = "waitlist_api=info,tower_http=info,sqlx=warn";

/// Compact, human readable output for local development.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter(DEFAULT_DBG_FILTER))
        .compact()
        .init();
}

/// One JSON object per event, including the current span, for log collectors.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_env_filter(env_filter(DEFAULT_PRODUCTION_FILTER))
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
