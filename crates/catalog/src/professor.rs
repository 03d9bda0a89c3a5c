//! Professors and their compensation mode.

use serde::{Deserialize, Serialize};

use eduledger_core::{Money, Period, ProfessorId};

/// How a professor is compensated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompensationMode {
    /// One base amount per period, independent of class assignments.
    Monthly,
    /// Paid per class group, per period.
    PerClass,
}

/// Mode assumed when a professor's mode is unset or was unrecognized at the
/// boundary.
///
/// Defensive fallback observed in the legacy system, not a confirmed product
/// rule; a monthly default hides the class context rather than inventing a
/// per-class rate.
pub const DEFAULT_COMPENSATION_MODE: CompensationMode = CompensationMode::Monthly;

impl CompensationMode {
    /// Parse the legacy free-text labels once at the boundary.
    ///
    /// The old database stored monthly as `fixed`; several per-class spellings
    /// circulated. Anything else maps to `None` (unset), which resolvers treat
    /// as [`DEFAULT_COMPENSATION_MODE`].
    pub fn from_label(label: &str) -> Option<CompensationMode> {
        match label.trim().to_ascii_lowercase().as_str() {
            "fixed" | "monthly" => Some(CompensationMode::Monthly),
            "per-class" | "perclass" | "class" => Some(CompensationMode::PerClass),
            _ => None,
        }
    }
}

/// A professor as the payroll engine sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    /// Base amount per period for monthly professors.
    pub base_amount: Money,
    /// `None` when the stored mode was absent or unrecognized.
    pub mode: Option<CompensationMode>,
    /// First payable period (the month the professor joined), when known.
    pub since: Option<Period>,
}

impl Professor {
    pub fn effective_mode(&self) -> CompensationMode {
        self.mode.unwrap_or(DEFAULT_COMPENSATION_MODE)
    }
}
