//! # Validator Configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the `format` keyword is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPolicy {
    /// `format` is an annotation only.
    Ignore,
    /// Known formats are checked; unknown names pass.
    #[default]
    Enforce,
    /// Known formats are checked; unknown names fail.
    EnforceStrict,
}

impl FormatPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Enforce => "enforce",
            Self::EnforceStrict => "strict",
        }
    }
}

impl fmt::Display for FormatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy name that is not one of `ignore`, `enforce` or `strict`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format policy '{0}' (expected ignore, enforce or strict)")]
pub struct UnknownFormatPolicy(pub String);

impl FromStr for FormatPolicy {
    type Err = UnknownFormatPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "enforce" => Ok(Self::Enforce),
            "strict" | "enforce_strict" => Ok(Self::EnforceStrict),
            other => Err(UnknownFormatPolicy(other.to_string())),
        }
    }
}

/// Options for a [`Validator`](crate::engine::Validator).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub format_policy: FormatPolicy,
}

impl ValidatorConfig {
    /// Builder: set the format policy.
    pub fn with_format_policy(mut self, policy: FormatPolicy) -> Self {
        self.format_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_cli_spellings() {
        assert_eq!("strict".parse::<FormatPolicy>().unwrap(), FormatPolicy::EnforceStrict);
        assert_eq!("ignore".parse::<FormatPolicy>().unwrap(), FormatPolicy::Ignore);
        assert!("lenient".parse::<FormatPolicy>().is_err());
    }

    #[test]
    fn config_defaults_to_enforce() {
        let config: ValidatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.format_policy, FormatPolicy::Enforce);
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"format_policy": "enforce_strict"}"#).unwrap();
        assert_eq!(config.format_policy, FormatPolicy::EnforceStrict);
    }
}
