//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - QUIZ_LOG controls the filter (e.g. "debug" or
//!   "info,quiz_bulk=debug,quiz_validate=debug").
//! - QUIZ_LOG_FORMAT selects "pretty" (default) or "json".
//!
//! Logs go to stderr so stdout stays clean for reports.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match std::env::var("QUIZ_LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
