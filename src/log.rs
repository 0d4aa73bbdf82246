use std::fmt;

use anyhow::Result;
use chrono::Local;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{filter::Targets, fmt as layer_fmt, prelude::*, registry};

use crate::cli::Cli;

/// Log timestamps with the local time only (HH:MM:SS.mmm+00:00).
pub struct LocalTimeOnly;

impl FormatTime for LocalTimeOnly {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%H:%M:%S%.3f%:z"))
    }
}

/// Build the logger based on command-line arguments.
///
/// Diagnostics go to stderr so stdout only carries reports.
pub fn build_logger(cli_args: &Cli) -> Dispatch {
    let console_fmt = layer_fmt::layer()
        .with_target(false)
        .with_timer(LocalTimeOnly)
        .with_ansi(!cli_args.no_color)
        .with_writer(std::io::stderr);

    let console_filter = Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("up", cli_args.log_level());

    Dispatch::new(registry().with(console_fmt.with_filter(console_filter)))
}

/// Install the logger as the global default.
pub fn init_logger(logger: &Dispatch) -> Result<()> {
    tracing::dispatcher::set_global_default(logger.clone())?;
    Ok(())
}
