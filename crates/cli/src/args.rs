//! Argument parsing for the `folder-mirror` binary.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};
use walk::ExcludedNames;

/// Parsed command-line invocation.
#[derive(Debug)]
pub(crate) struct Invocation {
    pub(crate) source: PathBuf,
    pub(crate) replica: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) interval_secs: u64,
    pub(crate) excluded: ExcludedNames,
}

pub(crate) fn command() -> Command {
    Command::new("folder-mirror")
        .about("Mirrors a source directory tree into a replica on a fixed interval")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Directory to mirror from")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("replica")
                .value_name("REPLICA")
                .help("Directory kept convergent with SOURCE")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log")
                .value_name("LOG_FILE")
                .help("File receiving the mirror log")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("interval")
                .value_name("SECONDS")
                .help("Seconds between sync cycles")
                .required(true)
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .short('x')
                .value_name("NAME")
                .help("File name ignored at every directory level; repeatable")
                .action(ArgAction::Append),
        )
}

pub(crate) fn parse<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut matches = command().try_get_matches_from(args)?;

    let excluded: ExcludedNames = matches
        .remove_many::<String>("exclude")
        .map(|names| names.collect())
        .unwrap_or_default();

    Ok(Invocation {
        source: matches
            .remove_one::<PathBuf>("source")
            .expect("SOURCE is required"),
        replica: matches
            .remove_one::<PathBuf>("replica")
            .expect("REPLICA is required"),
        log_path: matches
            .remove_one::<PathBuf>("log")
            .expect("LOG_FILE is required"),
        interval_secs: matches
            .remove_one::<u64>("interval")
            .expect("SECONDS is required"),
        excluded,
    })
}
