//! Log sink installation: stdout plus a non-blocking file writer.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Creates (or truncates) the log file and installs the global subscriber.
///
/// Events go to stdout and, without ANSI escapes, to the file sink. The
/// returned guard must stay alive for the lifetime of the process; dropping
/// it flushes and detaches the background writer.
pub(crate) fn init(log_path: &Path) -> io::Result<WorkerGuard> {
    let file = File::create(log_path)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}
