#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` turns a pair of directory snapshots into the filesystem
//! operations that make a replica tree converge on a source tree. One call
//! to [`run_cycle`] captures both snapshots and then runs two reconcilers
//! over the same immutable pair:
//!
//! - the addition/update pass creates missing replica directories, copies
//!   missing files, and re-copies files whose content diverged, and
//! - the deletion pass removes replica files and directory subtrees that no
//!   longer exist on the source side.
//!
//! The two passes are concurrently scheduled ([`rayon::join`]) and both
//! complete before the cycle returns. They operate on disjoint concerns but
//! on the same live filesystem, so a source mutation racing the cycle can
//! make an individual operation fail; the mirror is best-effort rather than
//! transactional, and every mutation is therefore guarded locally.
//!
//! # Change detection
//!
//! A replica file is re-copied only when its modification time differs from
//! the source *and* the content fingerprints differ. The cheap mtime check
//! filters the common unchanged case so cycle cost scales with the amount of
//! actual change, not with total mirror size; the fingerprint check stops a
//! bare mtime bump from triggering a spurious copy.
//!
//! # Errors
//!
//! Per-operation failures are caught at the failing file or directory,
//! logged at warn level with path and cause, counted in the returned
//! [`CycleSummary`], and never abort the rest of the cycle. The only
//! non-local bail-out is a source snapshot that could not read its own root:
//! acting on that empty view would schedule deletion of the entire replica,
//! so the cycle is skipped instead.

mod additions;
mod cycle;
mod deletions;
mod error;
mod paths;

pub use cycle::{CycleSummary, run_cycle};
pub use error::{OpError, OpErrorKind};
