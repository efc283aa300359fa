//! CLI entry point for the `aal` interpreter binary.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use aal_cli::{build_program, load_file, CliError};
use aal_core::{EngineConfig, Machine, ReaderInput, Termination};
use log::{debug, info};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: aal <command> [options]

Commands:
  run  <input> [--verbose] [--max-steps <n>]  Execute a program
  list <input>                                Print the aligned listing

Options:
  -v, --verbose        Trace every instruction (run only)
  --max-steps <n>      Abort after n executed instructions (run only)
  -h, --help           Show this help message

READ takes integers from stdin; PRINT writes to stdout.
Set RUST_LOG=debug for interpreter logs on stderr.

Examples:
  aal run factorial.aal
  echo 5 | aal run factorial.aal --verbose
  aal list factorial.aal
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    List(ListArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    verbose: bool,
    max_steps: Option<u64>,
}

#[derive(Debug, PartialEq, Eq)]
struct ListArgs {
    input: PathBuf,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "list" => parse_list_args(args)
            .map(Command::List)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut verbose = false;
    let mut max_steps: Option<u64> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "--max-steps" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-steps".to_string())?;
            let value = value.to_string_lossy();
            let parsed = value
                .parse::<u64>()
                .map_err(|_| format!("invalid step count: {value}"))?;
            max_steps = Some(parsed);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(RunArgs {
        input,
        verbose,
        max_steps,
    })
}

fn parse_list_args(args: impl Iterator<Item = OsString>) -> Result<ListArgs, String> {
    let mut input: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(ListArgs { input })
}

const fn engine_config(args: &RunArgs) -> EngineConfig {
    EngineConfig {
        verbose: args.verbose,
        step_limit: args.max_steps,
    }
}

fn run_program(args: &RunArgs) -> Result<(), CliError> {
    let source = load_file(&args.input)?;
    let program = build_program(&source)?;

    let stdin = io::stdin();
    let mut input = ReaderInput::new(stdin.lock());
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let mut machine = Machine::new(engine_config(args));
    let outcome = machine
        .run(&program, &mut input, &mut output)
        .map_err(|e| source.locate(e))?;

    if outcome.termination == Termination::RanOffEnd {
        info!("{} ended without END", args.input.display());
    }
    debug!("{} steps", outcome.steps);
    Ok(())
}

fn list_program(args: &ListArgs) -> Result<(), CliError> {
    let source = load_file(&args.input)?;
    let program = build_program(&source)?;

    let stdout = io::stdout();
    let mut output = stdout.lock();
    output
        .write_all(program.render().as_bytes())
        .and_then(|()| output.flush())
        .map_err(|e| CliError::from(aal_core::AalError::from(e)))
}

fn report(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e.format_for_stderr());
            1
        }
    }
}

fn main() {
    env_logger::init();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => report(run_program(&args)),
        Ok(ParseResult::Command(Command::List(args))) => report(list_program(&args)),
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
