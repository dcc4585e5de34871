//! javelin_options: parser configuration.
//!
//! `CompilerOptions` is the serialized form (camelCase JSON). Parsers work
//! with the validated `ResolvedOptions` produced by
//! [`CompilerOptions::validate`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use javelin_diagnostics::DiagnosticCategory;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown Java level `{0}`")]
    UnknownLevel(String),

    #[error("source level {source_level} is above compliance level {compliance}")]
    SourceAboveCompliance {
        source_level: SourceLevel,
        compliance: SourceLevel,
    },

    /// Severity overrides are accepted only for the configurable problems.
    #[error("problem `{0}` is not configurable")]
    NotConfigurable(String),

    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read options file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parser options, matching the JSON schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Java level the source is written for, e.g. `"1.8"` or `"17"`.
    pub source_level: Option<String>,
    pub compliance_level: Option<String>,
    /// Keep malformed statements instead of dropping them.
    pub statement_recovery: Option<bool>,
    /// Problem name to severity, for the configurable problems only.
    pub severities: Option<BTreeMap<String, Severity>>,
}

impl CompilerOptions {
    /// Check the options and resolve every default.
    pub fn validate(&self) -> Result<ResolvedOptions, OptionsError> {
        let source_level = match &self.source_level {
            Some(text) => SourceLevel::parse(text)?,
            None => SourceLevel::LATEST,
        };
        let compliance_level = match &self.compliance_level {
            Some(text) => SourceLevel::parse(text)?,
            None => SourceLevel::LATEST,
        };
        if source_level > compliance_level {
            return Err(OptionsError::SourceAboveCompliance {
                source_level,
                compliance: compliance_level,
            });
        }

        let mut severities = Severities::default();
        for (name, severity) in self.severities.iter().flatten() {
            let problem = ConfigurableProblem::from_name(name)
                .ok_or_else(|| OptionsError::NotConfigurable(name.clone()))?;
            severities.set(problem, *severity);
        }

        Ok(ResolvedOptions {
            source_level,
            compliance_level,
            statement_recovery: self.statement_recovery.unwrap_or(false),
            severities,
        })
    }
}

/// Validated options with all defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub source_level: SourceLevel,
    pub compliance_level: SourceLevel,
    pub statement_recovery: bool,
    pub severities: Severities,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            source_level: SourceLevel::LATEST,
            compliance_level: SourceLevel::LATEST,
            statement_recovery: false,
            severities: Severities::default(),
        }
    }
}

// ============================================================================
// Levels
// ============================================================================

/// A Java language level, stored as its major version (`1.8` is 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLevel(u8);

impl SourceLevel {
    pub const JAVA_1_4: SourceLevel = SourceLevel(4);
    pub const JAVA_5: SourceLevel = SourceLevel(5);
    pub const JAVA_7: SourceLevel = SourceLevel(7);
    pub const JAVA_8: SourceLevel = SourceLevel(8);
    pub const JAVA_10: SourceLevel = SourceLevel(10);
    pub const JAVA_14: SourceLevel = SourceLevel(14);
    pub const JAVA_15: SourceLevel = SourceLevel(15);
    pub const JAVA_16: SourceLevel = SourceLevel(16);
    pub const JAVA_17: SourceLevel = SourceLevel(17);
    pub const LATEST: SourceLevel = SourceLevel(21);

    const OLDEST: u8 = 3;

    /// Parse `"1.3"` to `"1.8"` or `"5"` to `"21"`.
    pub fn parse(text: &str) -> Result<SourceLevel, OptionsError> {
        let trimmed = text.trim();
        let major = match trimmed.strip_prefix("1.") {
            Some(minor) => minor.parse::<u8>().ok().filter(|m| *m <= 8),
            None => trimmed.parse::<u8>().ok().filter(|m| *m >= 5),
        };
        major
            .filter(|m| (Self::OLDEST..=Self::LATEST.0).contains(m))
            .map(SourceLevel)
            .ok_or_else(|| OptionsError::UnknownLevel(text.to_string()))
    }

    pub fn major(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= 8 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ============================================================================
// Severities
// ============================================================================

/// How a configurable problem is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Ignore,
}

impl Severity {
    /// The diagnostic category, or `None` when the problem is ignored.
    pub fn category(self) -> Option<DiagnosticCategory> {
        match self {
            Severity::Error => Some(DiagnosticCategory::Error),
            Severity::Warning => Some(DiagnosticCategory::Warning),
            Severity::Info => Some(DiagnosticCategory::Info),
            Severity::Ignore => None,
        }
    }
}

/// Problems whose severity can be overridden. Syntax errors are always
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurableProblem {
    /// `;` after a member or type declaration.
    UnnecessarySemicolon,
    /// `if (c);`, `while (c);` and `for (...);`.
    EmptyControlStatement,
    /// A construct newer than the configured source level.
    SourceLevelFeature,
    /// Old syntax such as `int m()[]`.
    DeprecatedSyntax,
}

impl ConfigurableProblem {
    pub const ALL: [ConfigurableProblem; 4] = [
        ConfigurableProblem::UnnecessarySemicolon,
        ConfigurableProblem::EmptyControlStatement,
        ConfigurableProblem::SourceLevelFeature,
        ConfigurableProblem::DeprecatedSyntax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigurableProblem::UnnecessarySemicolon => "unnecessarySemicolon",
            ConfigurableProblem::EmptyControlStatement => "emptyControlStatement",
            ConfigurableProblem::SourceLevelFeature => "sourceLevelFeature",
            ConfigurableProblem::DeprecatedSyntax => "deprecatedSyntax",
        }
    }

    pub fn from_name(name: &str) -> Option<ConfigurableProblem> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    fn default_severity(self) -> Severity {
        match self {
            ConfigurableProblem::UnnecessarySemicolon => Severity::Ignore,
            ConfigurableProblem::EmptyControlStatement => Severity::Ignore,
            ConfigurableProblem::SourceLevelFeature => Severity::Error,
            ConfigurableProblem::DeprecatedSyntax => Severity::Warning,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Effective severity of every configurable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Severities([Severity; 4]);

impl Default for Severities {
    fn default() -> Self {
        Severities(ConfigurableProblem::ALL.map(ConfigurableProblem::default_severity))
    }
}

impl Severities {
    pub fn get(&self, problem: ConfigurableProblem) -> Severity {
        self.0[problem.index()]
    }

    pub fn set(&mut self, problem: ConfigurableProblem, severity: Severity) {
        self.0[problem.index()] = severity;
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parse options from a JSON string.
pub fn parse_options(content: &str) -> Result<CompilerOptions, OptionsError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse options from a JSON file.
pub fn parse_options_file(path: impl AsRef<Path>) -> Result<CompilerOptions, OptionsError> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let resolved = CompilerOptions::default().validate().unwrap();
        assert_eq!(resolved, ResolvedOptions::default());
        assert!(!resolved.statement_recovery);
        assert_eq!(
            resolved.severities.get(ConfigurableProblem::SourceLevelFeature),
            Severity::Error
        );
    }

    #[test]
    fn test_parse_json() {
        let options = parse_options(
            r#"{
                "sourceLevel": "1.8",
                "complianceLevel": "11",
                "statementRecovery": true,
                "severities": { "unnecessarySemicolon": "warning" }
            }"#,
        )
        .unwrap();
        let resolved = options.validate().unwrap();
        assert_eq!(resolved.source_level, SourceLevel::JAVA_8);
        assert_eq!(resolved.compliance_level.major(), 11);
        assert!(resolved.statement_recovery);
        assert_eq!(
            resolved.severities.get(ConfigurableProblem::UnnecessarySemicolon),
            Severity::Warning
        );
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(SourceLevel::parse("1.4").unwrap(), SourceLevel::JAVA_1_4);
        assert_eq!(SourceLevel::parse("17").unwrap(), SourceLevel::JAVA_17);
        assert_eq!(SourceLevel::JAVA_8.to_string(), "1.8");
        assert_eq!(SourceLevel::JAVA_17.to_string(), "17");
        for bad in ["1.9", "4", "99", "eight", ""] {
            assert!(
                matches!(SourceLevel::parse(bad), Err(OptionsError::UnknownLevel(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_source_above_compliance() {
        let options = CompilerOptions {
            source_level: Some("17".into()),
            compliance_level: Some("1.8".into()),
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.to_string(), "source level 17 is above compliance level 1.8");
    }

    #[test]
    fn test_syntax_errors_are_not_configurable() {
        let options = parse_options(r#"{ "severities": { "syntaxError": "ignore" } }"#).unwrap();
        assert!(matches!(
            options.validate(),
            Err(OptionsError::NotConfigurable(name)) if name == "syntaxError"
        ));
    }

    #[test]
    fn test_unknown_severity_is_a_json_error() {
        let err = parse_options(r#"{ "severities": { "deprecatedSyntax": "fatal" } }"#)
            .unwrap_err();
        assert!(matches!(err, OptionsError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_options_file("/definitely/not/here/options.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io(_)));
    }
}
