//! Invoice payment planning: one lump payment in, invoice drafts out.

use serde::{Deserialize, Serialize};

use eduledger_catalog::CatalogSnapshot;
use eduledger_core::{
    BatchId, ClassId, DomainResult, Money, Period, SettlementStatus, StudentId, allocate,
};

use crate::balance::InvoiceLedger;
use crate::invoice::TaxCode;

/// A new invoice record to be persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub student: StudentId,
    pub class: ClassId,
    pub period: Period,
    /// The period's remaining balance at planning time.
    pub required_amount: Money,
    pub settled_amount: Money,
    pub status: SettlementStatus,
    pub tax_code: TaxCode,
    pub batch: BatchId,
}

/// Outcome of one invoice planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePaymentPlan {
    /// Stamped on every draft so the run's records group as one transaction.
    pub batch: BatchId,
    pub drafts: Vec<InvoiceDraft>,
    /// Excess funds not applied anywhere (payment exceeded total remaining).
    pub unapplied: Money,
}

impl InvoicePaymentPlan {
    pub fn applied_total(&self) -> Money {
        self.drafts.iter().map(|d| d.settled_amount).sum()
    }
}

/// Spread one payment across the selected periods for (student, class).
///
/// Fails validation (no periods, negative amount, unknown class, negative
/// resolved fee) before producing any draft; otherwise returns the full set
/// of drafts for the caller to persist inside its own transaction boundary.
/// Funds running out early is not an error; the plan simply contains fewer
/// drafts, possibly none.
pub fn plan_invoice_payment(
    catalog: &CatalogSnapshot,
    ledger: &InvoiceLedger,
    student: StudentId,
    class: ClassId,
    periods: &[Period],
    amount: Money,
    tax_code: TaxCode,
) -> DomainResult<InvoicePaymentPlan> {
    let fee = catalog.monthly_fee(student, class)?;
    let outcome = allocate(periods, amount, |period| {
        fee.sub_clamped(ledger.settled_total(student, class, period))
    })?;

    let batch = BatchId::new();
    let drafts: Vec<InvoiceDraft> = outcome
        .allocations
        .iter()
        .map(|a| InvoiceDraft {
            student,
            class,
            period: a.period,
            required_amount: a.required,
            settled_amount: a.applied,
            status: a.status,
            tax_code,
            batch,
        })
        .collect();

    if outcome.has_unapplied() {
        tracing::warn!(
            %student,
            %class,
            unapplied = %outcome.unapplied,
            "payment exceeds total remaining; excess not applied"
        );
    }
    tracing::debug!(
        %student,
        %class,
        %batch,
        drafts = drafts.len(),
        applied = %outcome.applied_total(),
        "planned invoice payment"
    );

    Ok(InvoicePaymentPlan {
        batch,
        drafts,
        unapplied: outcome.unapplied,
    })
}
