//! Risk alert types and severity levels.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Severity of a risk alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskSeverity {
    /// The reported figure can be misread.
    Warning,
}

/// Discriminant for the kind of risk alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskAlertKind {
    /// A negative-earnings company whose shocked coverage is negative: a
    /// larger shock makes the number more negative, which looks like an
    /// improvement under magnitude comparison.
    NegativeCoverageSignFlip {
        company: String,
        original_ebitda: Decimal,
        shocked_coverage: Decimal,
    },
}

/// A single alert surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub timestamp: DateTime<Utc>,
    pub severity: RiskSeverity,
    pub kind: RiskAlertKind,
    pub message: String,
}

impl RiskAlert {
    pub fn new(severity: RiskSeverity, kind: RiskAlertKind, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            kind,
            message,
        }
    }

    /// Log the alert at a level matching its severity.
    pub fn log(&self) {
        match self.severity {
            RiskSeverity::Warning => tracing::warn!(alert = %self.message, "RISK WARNING"),
        }
    }
}
