//! Salary statement ledger records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eduledger_core::{
    ClassId, DomainError, DomainResult, Money, Period, ProfessorId, RecordId, SettlementStatus,
    derive_status,
};

/// One salary statement row in the ledger.
///
/// `class` is `None` for monthly-salaried professors; per-class statements
/// carry the class they pay for. As with invoices, several statements may
/// share a (professor, class, period) scope, so owed amounts are sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStatement {
    pub id: RecordId,
    pub professor: ProfessorId,
    pub class: Option<ClassId>,
    pub period: Period,
    /// Full base for the period under the resolved rate, not the remaining.
    pub required_base_amount: Money,
    /// Advances count against the base exactly like settled pay.
    pub advances_amount: Money,
    pub settled_amount: Money,
    pub status: SettlementStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SalaryStatement {
    /// Total credited against the base: settled plus advances.
    pub fn credited(&self) -> Money {
        self.settled_amount.saturating_add(self.advances_amount)
    }

    /// Validate the record invariant: amounts non-negative and
    /// `settled + advances ≤ required_base`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.settled_amount.is_negative() || self.advances_amount.is_negative() {
            return Err(DomainError::invariant(
                "settled and advances amounts must not be negative",
            ));
        }
        if self.credited() > self.required_base_amount {
            return Err(DomainError::invariant(
                "settled plus advances must not exceed the base amount",
            ));
        }
        Ok(())
    }

    /// Reassign settled/advances, clamping so the invariant holds, and
    /// recompute the status from the credited total.
    ///
    /// Advances are applied first (they were paid first); the settled amount
    /// absorbs the clamp. Returns `true` when anything was clamped; the
    /// caller may log it but must not abort.
    pub fn reassign(&mut self, settled: Money, advances: Money) -> bool {
        let advances_clamped = advances
            .max(Money::ZERO)
            .min(self.required_base_amount);
        let settled_cap = self.required_base_amount.sub_clamped(advances_clamped);
        let settled_clamped = settled.max(Money::ZERO).min(settled_cap);
        let clamped = settled_clamped != settled || advances_clamped != advances;

        self.settled_amount = settled_clamped;
        self.advances_amount = advances_clamped;
        self.status = derive_status(self.credited(), self.required_base_amount);
        clamped
    }
}
