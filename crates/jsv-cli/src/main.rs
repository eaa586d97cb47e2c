//! # jsv CLI entry point
//!
//! Parses command-line arguments, sets up logging and dispatches to the
//! subcommand handlers in the library crate.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsv_cli::check::{run_check_schema, CheckSchemaArgs};
use jsv_cli::config::CliConfig;
use jsv_cli::validate::{run_validate, ValidateArgs};

/// JSON Schema validator for drafts 3, 4, 5 and 6.
#[derive(Parser, Debug)]
#[command(name = "jsv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a JSON or YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate instance documents against a schema.
    Validate(ValidateArgs),

    /// Load a schema and report problems found while loading it.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("jsv v{} starting", env!("CARGO_PKG_VERSION"));

    let result =
        CliConfig::load_or_default(cli.config.as_deref()).and_then(|config| match &cli.command {
            Commands::Validate(args) => run_validate(args, &config),
            Commands::CheckSchema(args) => run_check_schema(args, &config),
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise the level follows `-v`.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbose)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsv_cli::OutputFormat;
    use jsv_core::Draft;
    use jsv_validator::FormatPolicy;

    #[test]
    fn cli_parse_validate_minimal() {
        let cli = Cli::try_parse_from(["jsv", "validate", "--schema", "s.json", "a.json"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, PathBuf::from("s.json"));
        assert_eq!(args.instances, vec![PathBuf::from("a.json")]);
        assert!(args.draft.is_none());
        assert!(args.formats.is_none());
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn cli_parse_validate_all_options() {
        let cli = Cli::try_parse_from([
            "jsv",
            "validate",
            "--schema",
            "s.yaml",
            "--draft",
            "4",
            "--format",
            "json",
            "--formats",
            "strict",
            "a.json",
            "b.yaml",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.draft, Some(Draft::Draft4));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.formats, Some(FormatPolicy::EnforceStrict));
        assert_eq!(args.instances.len(), 2);
    }

    #[test]
    fn cli_parse_validate_requires_an_instance() {
        assert!(Cli::try_parse_from(["jsv", "validate", "--schema", "s.json"]).is_err());
    }

    #[test]
    fn cli_parse_validate_rejects_unknown_draft() {
        assert!(Cli::try_parse_from([
            "jsv", "validate", "--schema", "s.json", "--draft", "7", "a.json"
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_validate_rejects_unknown_policy() {
        assert!(Cli::try_parse_from([
            "jsv", "validate", "--schema", "s.json", "--formats", "loose", "a.json"
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_check_schema() {
        let cli =
            Cli::try_parse_from(["jsv", "check-schema", "--schema", "s.json", "--emit", "draft3"])
                .unwrap();
        let Commands::CheckSchema(args) = cli.command else {
            panic!("expected check-schema");
        };
        assert_eq!(args.emit, Some(Draft::Draft3));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "jsv",
            "check-schema",
            "--schema",
            "s.json",
            "-vv",
            "--config",
            "jsv.yaml",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("jsv.yaml")));
        assert!(cli.log_json);
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(verbosity_level(0), "warn");
        assert_eq!(verbosity_level(1), "info");
        assert_eq!(verbosity_level(2), "debug");
        assert_eq!(verbosity_level(9), "trace");
    }
}
