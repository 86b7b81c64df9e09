//! Semantic checks on a loaded configuration.
//!
//! Parsing already guarantees the shape; these checks catch values that parse
//! fine but would make a sync pass misbehave.

use crate::schema::SkillsyncConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "registry.base_url"
    pub path: &'static str,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn push(&mut self, severity: Severity, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

/// Validate registry endpoints and transfer limits.
#[must_use]
pub fn validate(config: &SkillsyncConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    let registry = &config.registry;

    for (path, value) in [
        ("registry.manifest_url", &registry.manifest_url),
        ("registry.base_url", &registry.base_url),
    ] {
        match url::Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if url.scheme() == "http" {
                    result.push(
                        Severity::Warning,
                        path,
                        "plain http: downloads are only protected by manifest hashes",
                    );
                }
            },
            Ok(url) => result.push(
                Severity::Error,
                path,
                format!("unsupported scheme '{}'", url.scheme()),
            ),
            Err(e) => result.push(Severity::Error, path, format!("invalid URL: {e}")),
        }
    }

    if registry.concurrency_limit == 0 {
        result.push(
            Severity::Error,
            "registry.concurrency_limit",
            "must be at least 1",
        );
    }
    if registry.timeout_secs == 0 {
        result.push(
            Severity::Warning,
            "registry.timeout_secs",
            "0 disables the request timeout",
        );
    }

    result
}
