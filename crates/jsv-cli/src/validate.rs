//! # Validate Subcommand
//!
//! `jsv validate --schema <path> <instance>...` loads the schema once and
//! validates every instance document against it, JSON or YAML by file
//! extension. A file that cannot be read aborts the run; an invalid
//! instance does not.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use jsv_core::Draft;
use jsv_schema::fetch::read_document;
use jsv_validator::{FormatPolicy, ValidationReport, Validator};
use serde::Serialize;

use crate::config::CliConfig;
use crate::{load_schema, OutputFormat, EXIT_INVALID};

/// Arguments for `jsv validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON or YAML).
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Draft assumed when the schema has no `$schema` (3, 4, 5 or 6).
    #[arg(long)]
    pub draft: Option<Draft>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// How the `format` keyword is treated: ignore, enforce or strict.
    #[arg(long, value_name = "POLICY")]
    pub formats: Option<FormatPolicy>,

    /// Instance documents to validate.
    #[arg(required = true, value_name = "INSTANCE")]
    pub instances: Vec<PathBuf>,
}

/// Result of validating one instance file.
#[derive(Debug, Serialize)]
pub struct InstanceOutcome {
    pub instance: String,
    pub valid: bool,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// Run `jsv validate`. Returns `0` when every instance is valid and
/// [`EXIT_INVALID`] otherwise.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let loaded = load_schema(&args.schema, args.draft, config)?;

    let mut validator_config = config.validator.clone();
    if let Some(policy) = args.formats {
        validator_config = validator_config.with_format_policy(policy);
    }
    let validator = Validator::new(&loaded.graph).with_config(validator_config);

    let outcomes = validate_instances(&validator, &args.instances)?;
    print_outcomes(&outcomes, args.format)?;

    let invalid = outcomes.iter().filter(|o| !o.valid).count();
    tracing::info!(instances = outcomes.len(), invalid, "validation complete");
    Ok(if invalid == 0 { 0 } else { EXIT_INVALID })
}

/// Validate each instance file in order.
pub fn validate_instances(
    validator: &Validator<'_>,
    paths: &[PathBuf],
) -> Result<Vec<InstanceOutcome>> {
    paths
        .iter()
        .map(|path| validate_instance(validator, path))
        .collect()
}

fn validate_instance(validator: &Validator<'_>, path: &Path) -> Result<InstanceOutcome> {
    let document = read_document(path)
        .with_context(|| format!("failed to read instance {}", path.display()))?;
    let report = validator.validate(&document);
    if !report.is_valid() {
        tracing::debug!(instance = %path.display(), errors = report.len(), "instance invalid");
    }
    Ok(InstanceOutcome {
        instance: path.display().to_string(),
        valid: report.is_valid(),
        report,
    })
}

fn print_outcomes(outcomes: &[InstanceOutcome], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for outcome in outcomes {
                if outcome.valid {
                    println!("{}: valid", outcome.instance);
                } else {
                    println!("{}: invalid", outcome.instance);
                    print!("{}", outcome.report);
                }
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(outcomes).context("failed to serialize results")?;
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn args(schema: PathBuf, instances: Vec<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            schema,
            draft: None,
            format: OutputFormat::Text,
            formats: None,
            instances,
        }
    }

    #[test]
    fn all_valid_instances_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", r#"{"type": "object", "required": ["id"]}"#);
        let a = write(dir.path(), "a.json", r#"{"id": 1}"#);
        let b = write(dir.path(), "b.yaml", "id: two\n");

        let code = run_validate(&args(schema, vec![a, b]), &CliConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn an_invalid_instance_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", r#"{"type": "object", "required": ["id"]}"#);
        let good = write(dir.path(), "good.json", r#"{"id": 1}"#);
        let bad = write(dir.path(), "bad.json", r#"{"name": "x"}"#);

        let code = run_validate(&args(schema, vec![good, bad]), &CliConfig::default()).unwrap();
        assert_eq!(code, EXIT_INVALID);
    }

    #[test]
    fn outcomes_carry_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", r#"{"items": {"type": "integer"}}"#);
        let instance = write(dir.path(), "list.json", r#"[1, "two", 3]"#);

        let loaded = load_schema(&schema, None, &CliConfig::default()).unwrap();
        let validator = Validator::new(&loaded.graph);
        let outcomes = validate_instances(&validator, &[instance]).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].valid);
        assert_eq!(outcomes[0].report.errors()[0].pointer_to_violation, "/1");

        let json = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(json[0]["valid"], false);
        assert_eq!(json[0]["errors"][0]["keyword"], "type");
    }

    #[test]
    fn format_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", r#"{"format": "ipv4"}"#);
        let instance = write(dir.path(), "addr.json", r#""not-an-address""#);

        let mut strict = args(schema.clone(), vec![instance.clone()]);
        strict.formats = Some(FormatPolicy::Enforce);
        assert_eq!(run_validate(&strict, &CliConfig::default()).unwrap(), EXIT_INVALID);

        let mut lenient = args(schema, vec![instance]);
        lenient.formats = Some(FormatPolicy::Ignore);
        assert_eq!(run_validate(&lenient, &CliConfig::default()).unwrap(), 0);
    }

    #[test]
    fn draft_flag_changes_interpretation() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(
            dir.path(),
            "schema.json",
            r#"{"properties": {"id": {"required": true}}}"#,
        );
        let instance = write(dir.path(), "empty.json", "{}");

        let mut draft3 = args(schema, vec![instance]);
        draft3.draft = Some(Draft::Draft3);
        assert_eq!(run_validate(&draft3, &CliConfig::default()).unwrap(), EXIT_INVALID);
    }

    #[test]
    fn unreadable_instance_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", "{}");
        let missing = dir.path().join("missing.json");

        let err = run_validate(&args(schema, vec![missing]), &CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read instance"));
    }

    #[test]
    fn broken_schema_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", r#"{"minLength": -1}"#);
        let instance = write(dir.path(), "x.json", "\"x\"");

        let err = run_validate(&args(schema, vec![instance]), &CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load schema"));
    }
}
