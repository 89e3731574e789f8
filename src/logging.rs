use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Filter applied to the console when `RUST_LOG` is not set.
pub const DEFAULT_CONSOLE_FILTER: &str = "info,clustering=info,scoring=warn,batch=info";

/// Filter applied to the rolling log file.
pub const DEFAULT_FILE_FILTER: &str = "debug";

/// Installs the global tracing subscriber.
///
/// Console output goes to stderr so that a feed written to stdout stays
/// machine readable. When `log_dir` is given, a second layer writes a daily
/// rolling `cluster_feed.log` into that directory.
pub fn configure_logging(log_dir: Option<&Path>) -> Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    let console_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    let file_log = log_dir.map(|dir| {
        let file_appender = rolling::daily(dir, "cluster_feed.log");
        fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
            .with_filter(EnvFilter::new(DEFAULT_FILE_FILTER))
    });

    tracing_subscriber::Registry::default()
        .with(console_log)
        .with(file_log)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
