#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Command-line front end for the folder mirror daemon: parses arguments,
//! installs the log sinks, validates the configuration, and parks on the
//! daemon until the process is terminated. Configuration problems are
//! reported synchronously on stderr with exit code 2 before any background
//! work starts.

mod args;
mod logging;

use std::ffi::OsString;
use std::process::ExitCode;

use daemon::{MirrorConfig, MirrorDaemon};
use tracing::error;

/// Exit code for usage and configuration failures.
const CONFIG_FAILURE: u8 = 2;

/// Runs the mirroring tool with the provided command-line arguments.
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = match args::parse(args) {
        Ok(invocation) => invocation,
        Err(parse_error) => {
            let code = if parse_error.use_stderr() {
                CONFIG_FAILURE
            } else {
                // --help and --version render on stdout and succeed.
                0
            };
            let _ = parse_error.print();
            return ExitCode::from(code);
        }
    };

    let _guard = match logging::init(&invocation.log_path) {
        Ok(guard) => guard,
        Err(open_error) => {
            eprintln!(
                "folder-mirror: cannot open log destination '{}': {open_error}",
                invocation.log_path.display()
            );
            return ExitCode::from(CONFIG_FAILURE);
        }
    };

    let config = match MirrorConfig::new(
        &invocation.source,
        &invocation.replica,
        invocation.interval_secs,
        invocation.excluded,
    ) {
        Ok(config) => config,
        Err(config_error) => {
            error!(%config_error, "rejected configuration");
            eprintln!("folder-mirror: {config_error}");
            return ExitCode::from(CONFIG_FAILURE);
        }
    };

    MirrorDaemon::start(config).join();
    ExitCode::SUCCESS
}
