//! # variant-cli
//!
//! Runs a product form command script and prints what the form would submit.
//!
//! ## Usage
//! ```bash
//! # Create flow: start from an empty form
//! variant-cli --script edits.json
//!
//! # Edit flow: load a saved product first
//! variant-cli --record product.json --script edits.json
//!
//! # Script from stdin, print multipart fields instead of JSON
//! cat edits.json | variant-cli --script - --form-fields
//! ```
//!
//! ## Environment
//! - `RUST_LOG` - log filter (default `info,bazaar_core=debug,variant_cli=debug`), logs go to stderr
//! - `BAZAAR_MAX_OPTIONS` - option slot limit (default 5)
//! - `BAZAAR_MAX_VARIANTS` - variant limit (default 1000)

mod commands;
mod error;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use bazaar_core::{FormConfig, FormSession, ProductSubmission, VariantSummary};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{run_script, FormCommand, ScriptReport};
use crate::error::{CliError, CliResult};

const USAGE: &str = "usage: variant-cli [--record <path>] [--script <path|->] [--base-price <price>] [--form-fields]";

/// Parsed command-line flags.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    record: Option<PathBuf>,
    script: Option<PathBuf>,
    base_price: Option<String>,
    form_fields: bool,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> CliResult<Args> {
        let mut args = Args::default();

        while let Some(flag) = raw.next() {
            match flag.as_str() {
                "--record" | "-r" => args.record = Some(PathBuf::from(value_for(&flag, raw.next())?)),
                "--script" | "-s" => args.script = Some(PathBuf::from(value_for(&flag, raw.next())?)),
                "--base-price" | "-p" => args.base_price = Some(value_for(&flag, raw.next())?),
                "--form-fields" => args.form_fields = true,
                other => return Err(CliError::Usage(format!("unknown flag {other}\n{USAGE}"))),
            }
        }

        Ok(args)
    }
}

fn value_for(flag: &str, value: Option<String>) -> CliResult<String> {
    value.ok_or_else(|| CliError::Usage(format!("{flag} needs a value\n{USAGE}")))
}

/// JSON written to stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    submission: ProductSubmission,
    summary: VariantSummary,
    script: ScriptReport,
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse(std::env::args().skip(1))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliResult<Args>) -> CliResult<()> {
    let args = args?;
    let config = FormConfig::from_lookup(|key| std::env::var(key).ok());
    info!(
        max_options = config.max_options,
        max_variants = config.max_variants,
        "Starting form session"
    );

    let mut session = match &args.record {
        Some(path) => {
            let json = read_input(path)?;
            FormSession::from_record_json(&json, config)?
        }
        None => FormSession::new(config),
    };
    if let Some(price) = &args.base_price {
        session.set_base_price(price.as_str());
    }

    let commands: Vec<FormCommand> = match &args.script {
        Some(path) => serde_json::from_str(&read_input(path)?).map_err(|source| CliError::Parse {
            what: "script",
            source,
        })?,
        None => Vec::new(),
    };
    let report = run_script(&mut session, &commands)?;
    info!(
        applied = report.applied,
        rejected = report.rejected,
        variants = session.variants().len(),
        "Script finished"
    );

    let submission = session.submission();
    if args.form_fields {
        for (name, value) in submission.form_fields(session.base_price())? {
            println!("{name}={value}");
        }
    } else {
        let output = RunOutput {
            submission,
            summary: session.summary(),
            script: report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Reads a file, or stdin when the path is `-`.
fn read_input(path: &PathBuf) -> CliResult<String> {
    let read_err = |source: std::io::Error| CliError::Read {
        path: path.clone(),
        source,
    };

    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(read_err)
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every command and recomputation
/// - `RUST_LOG=bazaar_core=trace` - Core crate only
/// - Default: INFO, DEBUG for bazaar crates
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();
}

const DEFAULT_LOG_FILTER: &str = "info,bazaar_core=debug,variant_cli=debug";

/// Filter from `RUST_LOG`, or the default when it is unset or invalid.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> CliResult<Args> {
        Args::parse(flags.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&["--record", "p.json", "-s", "-", "--base-price", "12", "--form-fields"]).unwrap();
        assert_eq!(args.record, Some(PathBuf::from("p.json")));
        assert_eq!(args.script, Some(PathBuf::from("-")));
        assert_eq!(args.base_price.as_deref(), Some("12"));
        assert!(args.form_fields);

        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_log_filter_honours_directives() {
        assert_eq!(log_filter(Some("error".to_string())).to_string(), "error");
        assert!(log_filter(None).to_string().contains("bazaar_core=debug"));
        assert!(log_filter(Some("variant_cli=loud".to_string()))
            .to_string()
            .contains("bazaar_core=debug"));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(parse(&["--record"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["--verbose"]), Err(CliError::Usage(_))));
    }
}
