//! Hand-rolled flag parsing.
//!
//! Three flags and one positional argument don't need a flag-parsing
//! crate; a dependency pulled in elsewhere in this workspace for an
//! unrelated scaffolding tool isn't reached for here.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
Usage: faxc [options] <input>

Options:
    -o <path>   Output executable path (default: a.out)
    -c          Emit an object file only; do not link
    -h, --help  Print this help and exit
";

/// The source path and output options for one compilation.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub emit_object_only: bool,
}

/// The result of parsing argv: either a request to print usage, or a
/// ready-to-run configuration.
pub enum ParsedArgs {
    Help,
    Run(Config),
}

/// Parses `args` (argv with the program name already stripped).
pub fn parse_args<I>(args: I) -> Result<ParsedArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut input = None;
    let mut output = PathBuf::from("a.out");
    let mut emit_object_only = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParsedArgs::Help),
            "-c" => emit_object_only = true,
            "-o" => {
                let path = iter.next().context("-o requires a path argument")?;
                output = PathBuf::from(path);
            }
            other if input.is_none() => input = Some(PathBuf::from(other)),
            other => bail!("unexpected argument: '{other}'"),
        }
    }

    let input = input.context("missing input file")?;
    Ok(ParsedArgs::Run(Config { input, output, emit_object_only }))
}
