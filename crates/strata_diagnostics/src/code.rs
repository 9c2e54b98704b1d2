//! Diagnostic codes such as `W401`.
//!
//! The letter is fixed by the severity, so a code alone says whether the
//! diagnostic fails the run. Codes serialize as their display string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::severity::Severity;

/// A severity letter followed by a three-digit number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DiagnosticCode {
    severity: Severity,
    number: u16,
}

impl DiagnosticCode {
    /// A `W` code.
    pub const fn warning(number: u16) -> Self {
        Self {
            severity: Severity::Warning,
            number,
        }
    }

    /// An `E` code.
    pub const fn error(number: u16) -> Self {
        Self {
            severity: Severity::Error,
            number,
        }
    }

    /// The severity every diagnostic with this code carries.
    pub fn severity(self) -> Severity {
        self.severity
    }

    /// The number without its letter.
    pub fn number(self) -> u16 {
        self.number
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.severity.code_prefix(), self.number)
    }
}

impl FromStr for DiagnosticCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let severity = match chars.next() {
            Some('W') => Severity::Warning,
            Some('E') => Severity::Error,
            _ => return Err(format!("diagnostic code '{s}' must start with W or E")),
        };
        let digits = chars.as_str();
        if digits.len() != 3 {
            return Err(format!("diagnostic code '{s}' needs three digits"));
        }
        let number = digits
            .parse()
            .map_err(|_| format!("diagnostic code '{s}' needs three digits"))?;
        Ok(Self { severity, number })
    }
}

impl From<DiagnosticCode> for String {
    fn from(code: DiagnosticCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for DiagnosticCode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
