//! Remaining Balance Calculator for student invoices.

use serde::{Deserialize, Serialize};

use eduledger_catalog::CatalogSnapshot;
use eduledger_core::{ClassId, DomainResult, Money, Period, StudentId};

use crate::invoice::InvoiceRecord;

/// Snapshot of the invoice ledger as of one reconciliation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLedger {
    pub records: Vec<InvoiceRecord>,
}

impl InvoiceLedger {
    /// Total settled across every record matching (student, class, period).
    pub fn settled_total(&self, student: StudentId, class: ClassId, period: Period) -> Money {
        self.records
            .iter()
            .filter(|r| r.student == student && r.class == class && r.period == period)
            .map(|r| r.settled_amount)
            .sum()
    }

    /// Outstanding amount for one period: `max(0, fee − Σ settled)`.
    ///
    /// Pure over the two snapshots; callers recompute after every mutation
    /// rather than caching.
    pub fn remaining(
        &self,
        catalog: &CatalogSnapshot,
        student: StudentId,
        class: ClassId,
        period: Period,
    ) -> DomainResult<Money> {
        let fee = catalog.monthly_fee(student, class)?;
        Ok(fee.sub_clamped(self.settled_total(student, class, period)))
    }

    /// The class's billable periods that still carry an outstanding amount,
    /// ascending. `through` caps open-ended classes at the current period.
    pub fn unpaid_periods(
        &self,
        catalog: &CatalogSnapshot,
        student: StudentId,
        class: ClassId,
        through: Period,
    ) -> DomainResult<Vec<Period>> {
        let group = catalog.class(class)?;
        let mut unpaid = Vec::new();
        for period in group.billable_periods(through) {
            if self.remaining(catalog, student, class, period)?.is_positive() {
                unpaid.push(period);
            }
        }
        Ok(unpaid)
    }
}
