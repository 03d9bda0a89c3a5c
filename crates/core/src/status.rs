//! Settlement status derivation.
//!
//! Status is always a function of the settled and required totals; it is never
//! stored independently of the amounts that justify it.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Settlement status of a billing period or ledger record.
///
/// The derive order matters: `Due < Partial < Paid`, so increasing the settled
/// amount for a fixed required amount never moves the status backwards.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Due,
    Partial,
    Paid,
}

/// Status reported when nothing is required for the period.
///
/// The legacy system reports `partial` here rather than `paid`, which is
/// inconsistent with the general rule but is observed behavior, not a
/// confirmed product rule. Kept as a named constant so a product decision can
/// flip it without re-deriving the logic.
pub const ZERO_REQUIRED_STATUS: SettlementStatus = SettlementStatus::Partial;

/// Derive the settlement status for a (settled, required) pair.
///
/// - `Due` iff nothing is settled (and something is required).
/// - `Partial` iff settled is strictly between zero and required.
/// - `Paid` iff settled covers required and required is positive.
/// - required ≤ 0 → [`ZERO_REQUIRED_STATUS`].
pub fn derive_status(settled: Money, required: Money) -> SettlementStatus {
    if !required.is_positive() {
        return ZERO_REQUIRED_STATUS;
    }
    if settled.is_zero() || settled.is_negative() {
        SettlementStatus::Due
    } else if settled < required {
        SettlementStatus::Partial
    } else {
        SettlementStatus::Paid
    }
}
