//! Payment allocation: spreading one lump payment across billing periods.
//!
//! The allocator is generic over a remaining-balance lookup so the invoice and
//! salary planners share the exact same funding rules. It works on a snapshot
//! supplied by the caller and only produces drafts; persistence (and the
//! per-aggregate critical section around the read-compute-write cycle) is the
//! caller's job.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::period::Period;
use crate::status::{SettlementStatus, derive_status};

/// One funded period emitted by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub period: Period,
    /// The period's remaining balance at allocation time. Drafts record this
    /// as their required amount, so `applied <= required` always holds.
    pub required: Money,
    pub applied: Money,
    pub status: SettlementStatus,
}

/// Result of one allocator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Funded periods in ascending order. May be empty when every requested
    /// period was already settled.
    pub allocations: Vec<Allocation>,
    /// Funds left over after the run. Positive either because the lump
    /// exceeded the total remaining (excess is simply not applied) or because
    /// every period was already settled.
    pub unapplied: Money,
}

impl AllocationOutcome {
    pub fn applied_total(&self) -> Money {
        self.allocations.iter().map(|a| a.applied).sum()
    }

    /// True when the run left excess funds unapplied.
    pub fn has_unapplied(&self) -> bool {
        self.unapplied.is_positive()
    }
}

/// Allocate `funds` across `periods` in ascending order.
///
/// Per period: remaining ≤ 0 is skipped without consuming funds; once funds
/// run out the loop stops and a draft with zero applied amount is never
/// emitted.
/// Duplicate periods are collapsed so a month can never be funded twice
/// against the same snapshot.
///
/// Fails with a validation error before producing anything when no periods
/// are supplied or the payment amount is negative.
pub fn allocate<F>(periods: &[Period], funds: Money, remaining: F) -> DomainResult<AllocationOutcome>
where
    F: Fn(Period) -> Money,
{
    if periods.is_empty() {
        return Err(DomainError::validation("select at least one period"));
    }
    if funds.is_negative() {
        return Err(DomainError::validation("payment amount must not be negative"));
    }

    let mut ordered = periods.to_vec();
    ordered.sort();
    ordered.dedup();

    let mut available = funds;
    let mut allocations = Vec::new();
    for period in ordered {
        let due = remaining(period);
        if !due.is_positive() {
            // Already settled; skip without consuming funds.
            continue;
        }
        if !available.is_positive() {
            break;
        }
        let applied = available.min(due);
        allocations.push(Allocation {
            period,
            required: due,
            applied,
            status: derive_status(applied, due),
        });
        available = available.sub_clamped(applied);
        if !available.is_positive() {
            break;
        }
    }

    Ok(AllocationOutcome {
        allocations,
        unapplied: available,
    })
}
