//! # nocov
//!
//! A CLI tool to remove blocks of Go code from a coverage report.
//!
//! ## Overview
//!
//! nocov is built on top of nocovlib. It reads the profile written by
//! `go test -coverprofile`, finds `//nocoverage` comments in the sources it
//! references and prints the rewritten profile to stdout, ready for
//! `go tool cover`.
//!
//! ## Usage
//!
//! ```bash
//! # Drop marked, unexecuted blocks from c.out
//! nocov > filtered.out
//!
//! # Count marked blocks as executed once instead of dropping them
//! nocov --coverprofile cover.out --coverCount 1
//!
//! # Also drop vendored and generated files
//! nocov --ignore-dirs '^vendor$' --ignore-gen-files
//!
//! # Resolve files through the Go module in the current directory
//! nocov --module-root .
//! ```

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::style;
use nocovlib::{
    GoParser, GopathResolver, IgnoreMatcher, ModuleResolver, PathResolver, ProcessOptions,
    Processor, DEFAULT_COVER_COUNT, DEFAULT_MARKER,
};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("nocov")
        .version(env!("CARGO_PKG_VERSION"))
        .about("nocov - a golang tool to remove blocks of code from the coverage report")
        .arg(
            Arg::new("coverprofile")
                .long("coverprofile")
                .value_name("FILE")
                .default_value("c.out")
                .value_parser(value_parser!(PathBuf))
                .help("The cover profile as generated by: go test -coverprofile=<coverprofile>"),
        )
        .arg(
            Arg::new("commentMarker")
                .long("commentMarker")
                .value_name("PREFIX")
                .default_value(DEFAULT_MARKER)
                .help("The comment marking a block that cannot be covered by the tests"),
        )
        .arg(
            Arg::new("coverCount")
                .long("coverCount")
                .value_name("COUNT")
                .default_value("-1")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help(
                    "Hit count given to marked blocks that never ran. \
                     A negative count removes them from the report",
                ),
        )
        .arg(
            Arg::new("ignore-gen-files")
                .long("ignore-gen-files")
                .action(ArgAction::SetTrue)
                .help("Ignore files whose header says they are generated"),
        )
        .arg(
            Arg::new("ignore-dirs")
                .long("ignore-dirs")
                .value_name("REGEX")
                .help("Ignore files in directories matching this pattern"),
        )
        .arg(
            Arg::new("ignore-files")
                .long("ignore-files")
                .value_name("REGEX")
                .help("Ignore files whose name matches this pattern"),
        )
        .arg(
            Arg::new("module-root")
                .long("module-root")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Resolve files through the Go module at or above DIR instead of GOPATH"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Print a JSON summary of the run to stderr"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log resolved files and markers"),
        )
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Build ignore rules from matches
fn build_ignore(matches: &ArgMatches) -> Result<IgnoreMatcher, anyhow::Error> {
    let mut ignore = IgnoreMatcher::new().generated_files(matches.get_flag("ignore-gen-files"));

    if let Some(pattern) = matches.get_one::<String>("ignore-dirs") {
        ignore = ignore.dirs(pattern)?;
    }
    if let Some(pattern) = matches.get_one::<String>("ignore-files") {
        ignore = ignore.files(pattern)?;
    }

    Ok(ignore)
}

/// Pick the file layout used to find sources
fn build_resolver(matches: &ArgMatches) -> Result<Box<dyn PathResolver>, anyhow::Error> {
    match matches.get_one::<PathBuf>("module-root") {
        Some(dir) => Ok(Box::new(ModuleResolver::discover(dir)?)),
        None => Ok(Box::new(GopathResolver::from_env())),
    }
}

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    // Bad patterns fail before any output is produced.
    let ignore = build_ignore(matches)?;
    let resolver = build_resolver(matches)?;

    let options = ProcessOptions::new()
        .marker(
            matches
                .get_one::<String>("commentMarker")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_MARKER),
        )
        .cover_count(
            matches
                .get_one::<i64>("coverCount")
                .copied()
                .unwrap_or(DEFAULT_COVER_COUNT),
        )
        .ignore(ignore);

    let profile_path = matches
        .get_one::<PathBuf>("coverprofile")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("c.out"));

    let parser = GoParser::new();
    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());

    let mut processor = Processor::new(resolver.as_ref(), &parser, options);
    let summary = processor.process_path(&profile_path, out)?;

    if matches.get_flag("summary") {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = build_command().get_matches_from(["nocov"]);

        assert_eq!(
            matches.get_one::<PathBuf>("coverprofile").unwrap(),
            &PathBuf::from("c.out")
        );
        assert_eq!(
            matches.get_one::<String>("commentMarker").unwrap(),
            "//nocoverage"
        );
        assert_eq!(*matches.get_one::<i64>("coverCount").unwrap(), -1);
        assert!(!matches.get_flag("ignore-gen-files"));
    }

    #[test]
    fn test_negative_cover_count() {
        let matches = build_command().get_matches_from(["nocov", "--coverCount", "-3"]);

        assert_eq!(*matches.get_one::<i64>("coverCount").unwrap(), -3);
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let matches = build_command().get_matches_from(["nocov", "--ignore-files", "(oops"]);

        let err = build_ignore(&matches).unwrap_err();
        assert!(err.to_string().contains("(oops"));
    }

    #[test]
    fn test_ignore_flags() {
        let matches = build_command().get_matches_from([
            "nocov",
            "--ignore-dirs",
            "^vendor$",
            "--ignore-gen-files",
        ]);

        let ignore = build_ignore(&matches).unwrap();
        assert!(ignore.is_active());
        assert!(ignore.wants_content());
    }
}
