//! makegen — the build-file generator.
//!
//! Reads per-directory build descriptors, resolves every unit's transitive
//! dependency graph, and regenerates the build files. With no directory
//! arguments the root descriptor's subdirectory list is discovered
//! recursively; with arguments only the named directories are processed.

#![warn(missing_docs)]

mod run;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use makegen_common::relative_path;

/// The environment variable spliced into the argument list at startup,
/// parsed exactly like command-line arguments.
const FLAGS_VAR: &str = "MAKEGENFLAGS";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "makegen", version, about = "Build-file generator")]
pub struct Cli {
    /// Name of the build file to generate in each unit directory.
    #[arg(short = 'f', value_name = "NAME", default_value = "Makefile")]
    pub output: String,

    /// Print the relative path from FROM to TO and exit.
    #[arg(short = 'R', num_args = 2, value_names = ["FROM", "TO"])]
    pub relative: Option<Vec<String>>,

    /// Write a JSON summary of every unit's resolved graph to FILE.
    #[arg(long = "dump-graph", value_name = "FILE")]
    pub dump_graph: Option<PathBuf>,

    /// `NAME=value` variable overrides and unit directories to process.
    #[arg(value_name = "ARG")]
    pub args: Vec<String>,
}

/// Splices whitespace-separated `flags` into `argv` right after the program
/// name, so the environment is parsed exactly like the argument list.
fn splice_flags(mut argv: Vec<OsString>, flags: Option<&str>) -> Vec<OsString> {
    if let Some(flags) = flags {
        let extra: Vec<OsString> = flags.split_whitespace().map(OsString::from).collect();
        argv.splice(1..1, extra);
    }
    argv
}

fn main() {
    let env_flags = std::env::var(FLAGS_VAR).ok();
    let argv = splice_flags(std::env::args_os().collect(), env_flags.as_deref());
    let cli = Cli::parse_from(argv);

    if let Some(pair) = &cli.relative {
        let rel = relative_path(Path::new(&pair[0]), Path::new(&pair[1]));
        println!("{}", rel.display());
        return;
    }

    if let Err(err) = run::run(&cli, Path::new(".")) {
        eprintln!("{err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn default_output_name() {
        let cli = parse(&["makegen"]);
        assert_eq!(cli.output, "Makefile");
        assert!(cli.relative.is_none());
        assert!(cli.args.is_empty());
    }

    #[test]
    fn output_name_option() {
        let cli = parse(&["makegen", "-f", "GNUmakefile"]);
        assert_eq!(cli.output, "GNUmakefile");
    }

    #[test]
    fn relative_mode_takes_two_paths() {
        let cli = parse(&["makegen", "-R", "dlls/foo", "include"]);
        let pair = cli.relative.unwrap();
        assert_eq!(pair, ["dlls/foo", "include"]);
    }

    #[test]
    fn overrides_and_dirs_stay_positional() {
        let cli = parse(&["makegen", "CC=clang", "dlls/foo", "dlls/bar"]);
        assert_eq!(cli.args, ["CC=clang", "dlls/foo", "dlls/bar"]);
    }

    #[test]
    fn env_flags_parsed_like_argv() {
        let argv = splice_flags(
            vec![OsString::from("makegen"), OsString::from("dlls/foo")],
            Some("-f GNUmakefile CC=clang"),
        );
        let cli = Cli::parse_from(argv);
        assert_eq!(cli.output, "GNUmakefile");
        assert_eq!(cli.args, ["CC=clang", "dlls/foo"]);
    }

    #[test]
    fn no_env_flags_is_identity() {
        let argv = splice_flags(vec![OsString::from("makegen")], None);
        assert_eq!(argv, vec![OsString::from("makegen")]);
    }
}
