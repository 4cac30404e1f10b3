//! Steekproef - reproducible random sampling of workbook sheets

mod config;
mod error;

use anyhow::Context;
use config::Config;
use error::CliError;
use std::env;
use std::path::PathBuf;
use steekproef_core::{SampleOptions, Seed, default_output_path, sample_file};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: steekproef [OPTIONS] <FILE>");
    eprintln!();
    eprintln!("Shuffles the rows of every sheet in a workbook. The seed is read from");
    eprintln!("the control sheet (default 'Setup', column 'Random Seed') or drawn anew,");
    eprintln!("and written back so the same order can be reproduced later.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <FILE>                    Workbook to sample (.xlsx, .xlsm, .xlsb, .xls, .ods)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>       Output workbook (default: steekproef_<FILE>.xlsx)");
    eprintln!("  -s, --seed <N>            Use this seed (0..=999999999) instead of the stored one");
    eprintln!("  --config <FILE>           Load settings from this TOML file");
    eprintln!("  -q, --quiet               Only log errors and warnings");
    eprintln!("  -v, --verbose             Log per-sheet progress");
    eprintln!("  -h, --help                Print help");
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    seed: Option<Seed>,
    config: Option<PathBuf>,
    verbosity: Verbosity,
    help: bool,
}

fn take_value<'a>(
    args: &'a [String],
    i: &mut usize,
    option: &str,
    what: &'static str,
) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue {
            option: option.to_string(),
            what,
        })
}

/// Parse arguments (without the program name).
fn parse_args(args: &[String]) -> Result<Args, CliError> {
    let mut parsed = Args::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                parsed.help = true;
                return Ok(parsed);
            }
            opt @ ("-o" | "--output") => {
                parsed.output = Some(PathBuf::from(take_value(args, &mut i, opt, "a file path")?));
            }
            opt @ ("-s" | "--seed") => {
                parsed.seed = Some(take_value(args, &mut i, opt, "a value")?.parse::<Seed>()?);
            }
            opt @ "--config" => {
                parsed.config = Some(PathBuf::from(take_value(args, &mut i, opt, "a file path")?));
            }
            "-q" | "--quiet" => parsed.verbosity = Verbosity::Quiet,
            "-v" | "--verbose" => parsed.verbosity = Verbosity::Verbose,
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            arg => {
                if parsed.input.is_none() {
                    parsed.input = Some(PathBuf::from(arg));
                } else {
                    return Err(CliError::UnexpectedArgument(arg.to_string()));
                }
            }
        }
        i += 1;
    }

    if parsed.input.is_none() {
        return Err(CliError::MissingInput);
    }
    Ok(parsed)
}

fn init_logging(verbosity: Verbosity, config: &Config) {
    let level = match verbosity {
        Verbosity::Quiet => "warn",
        Verbosity::Verbose => "debug",
        Verbosity::Normal => config.log_level.as_deref().unwrap_or("info"),
    };
    let fallback = format!(
        "steekproef={level},steekproef_core={level},steekproef_engine={level}"
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .init();
}

fn run(args: Args, config: &Config) -> anyhow::Result<()> {
    let input = args.input.ok_or(CliError::MissingInput)?;
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&input, &config.output_prefix));

    let same_file = match (std::fs::canonicalize(&input), std::fs::canonicalize(&output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same_file {
        return Err(CliError::OutputIsInput(output).into());
    }

    let options = SampleOptions {
        control: config.control.clone(),
        seed: args.seed,
    };
    let job = sample_file(&input, &output, &options)
        .with_context(|| format!("Failed to sample {}", input.display()))?;

    println!("Seed: {} ({})", job.seed.seed, job.seed.origin);
    for diagnostic in &job.diagnostics {
        println!("{}", diagnostic);
    }
    println!("Wrote {}", output.display());
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let parsed = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) if parsed.help => {
            print_usage();
            return;
        }
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let (config, warnings) = config::load_config(parsed.config.as_ref());
    init_logging(parsed.verbosity, &config);
    for warning in warnings {
        warn!("{}", warning);
    }

    if let Err(e) = run(parsed, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_input_only() {
        let parsed = parse_args(&args(&["book.xlsx"])).unwrap();
        assert_eq!(parsed.input, Some(PathBuf::from("book.xlsx")));
        assert_eq!(parsed.output, None);
        assert_eq!(parsed.seed, None);
        assert_eq!(parsed.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_parse_all_options() {
        let parsed = parse_args(&args(&[
            "-o", "out.xlsx", "--seed", "42", "--config", "c.toml", "-v", "in.xlsx",
        ]))
        .unwrap();
        assert_eq!(parsed.input, Some(PathBuf::from("in.xlsx")));
        assert_eq!(parsed.output, Some(PathBuf::from("out.xlsx")));
        assert_eq!(parsed.seed, Seed::new(42));
        assert_eq!(parsed.config, Some(PathBuf::from("c.toml")));
        assert_eq!(parsed.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_parse_help_short_circuits() {
        let parsed = parse_args(&args(&["--help", "--bogus"])).unwrap();
        assert!(parsed.help);
    }

    #[test]
    fn test_parse_missing_value() {
        let err = parse_args(&args(&["in.xlsx", "--output"])).unwrap_err();
        assert_eq!(err.to_string(), "--output requires a file path");
    }

    #[test]
    fn test_parse_bad_seed() {
        let err = parse_args(&args(&["-s", "1000000000", "in.xlsx"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidSeed(_)));
        let err = parse_args(&args(&["-s", "abc", "in.xlsx"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidSeed(_)));
    }

    #[test]
    fn test_parse_unknown_option() {
        let err = parse_args(&args(&["--shuffle-harder", "in.xlsx"])).unwrap_err();
        assert!(matches!(err, CliError::UnknownOption(_)));
    }

    #[test]
    fn test_parse_requires_input() {
        assert!(matches!(parse_args(&[]), Err(CliError::MissingInput)));
    }

    #[test]
    fn test_parse_rejects_second_input() {
        let err = parse_args(&args(&["a.xlsx", "b.xlsx"])).unwrap_err();
        assert!(matches!(err, CliError::UnexpectedArgument(_)));
    }
}
