#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `daemon` owns the long-running half of the folder mirror: a validated
//! [`MirrorConfig`], one background thread running the cycle loop, and the
//! [`ShutdownToken`] that ends it.
//!
//! # Lifecycle
//!
//! [`MirrorDaemon::start`] consumes a configuration (already validated at
//! construction) and spawns the loop thread. Each iteration runs one full
//! reconciliation cycle via [`engine::run_cycle`], logs its summary, then
//! sleeps for the configured interval. [`MirrorDaemon::stop`] is
//! non-blocking; the loop observes the request at the next iteration
//! boundary (or immediately if it is sleeping) and exits after letting any
//! in-flight cycle finish. A stopped daemon is not restartable.
//!
//! Nothing escapes the loop: reconciliation failures are logged inside the
//! engine and only an explicit stop request ends the thread.

mod config;
mod shutdown;

pub use config::{ConfigError, MirrorConfig, RootRole};
pub use shutdown::ShutdownToken;

use std::thread;

use tracing::{debug, info};

/// Handle to a running mirror loop.
#[derive(Debug)]
pub struct MirrorDaemon {
    shutdown: ShutdownToken,
    handle: Option<thread::JoinHandle<()>>,
}

impl MirrorDaemon {
    /// Spawns the background loop for `config` and returns its handle.
    #[must_use]
    pub fn start(config: MirrorConfig) -> Self {
        info!(
            source = %config.source_root().display(),
            replica = %config.replica_root().display(),
            interval_secs = config.interval().as_secs(),
            "mirror daemon started"
        );

        let shutdown = ShutdownToken::new();
        let loop_token = shutdown.clone();
        let handle = thread::spawn(move || run_loop(&config, &loop_token));

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Requests a graceful stop without waiting for it to take effect.
    pub fn stop(&self) {
        self.shutdown.request_stop();
    }

    /// Blocks until the loop observes the stop request and exits.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(config: &MirrorConfig, shutdown: &ShutdownToken) {
    while !shutdown.is_stopped() {
        let summary = engine::run_cycle(
            config.source_root(),
            config.replica_root(),
            config.excluded(),
        );
        if summary.is_clean() {
            debug!("cycle finished with no changes");
        } else {
            info!(
                dirs_created = summary.dirs_created,
                files_copied = summary.files_copied,
                files_updated = summary.files_updated,
                files_deleted = summary.files_deleted,
                dirs_deleted = summary.dirs_deleted,
                failed_ops = summary.failed_ops,
                "cycle finished"
            );
        }

        if shutdown.wait_timeout(config.interval()) {
            break;
        }
    }
    info!("mirror daemon stopped");
}
