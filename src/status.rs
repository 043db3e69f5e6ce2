//! The single status line shown under the form.

use std::fmt;

/// Severity tag attached to a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    /// Stable lowercase tag, suitable for styling hooks in a host UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human-readable message plus its severity.
///
/// A cleared status has an empty message and no severity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub message: String,
    pub severity: Option<Severity>,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity: Some(severity),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Some(Severity::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
