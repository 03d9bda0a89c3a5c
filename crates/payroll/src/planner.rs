//! Salary payout planning: one lump payout in, statement drafts out.

use serde::{Deserialize, Serialize};

use eduledger_catalog::{CatalogSnapshot, CompensationMode};
use eduledger_core::{
    BatchId, ClassId, DomainResult, Money, Period, ProfessorId, SettlementStatus, allocate,
};

use crate::balance::SalaryLedger;

/// A new salary statement to be persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDraft {
    pub professor: ProfessorId,
    /// `None` for monthly-salaried professors.
    pub class: Option<ClassId>,
    pub period: Period,
    /// Full base for the period under the resolved rate, not the remaining.
    pub required_base_amount: Money,
    pub advances_amount: Money,
    pub settled_amount: Money,
    pub status: SettlementStatus,
    pub batch: BatchId,
}

/// Outcome of one salary planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryPaymentPlan {
    pub batch: BatchId,
    pub drafts: Vec<SalaryDraft>,
    pub unapplied: Money,
}

impl SalaryPaymentPlan {
    pub fn applied_total(&self) -> Money {
        self.drafts.iter().map(|d| d.settled_amount).sum()
    }
}

/// Spread one payout across the selected periods for a professor.
///
/// Monthly professors are paid against their base with the class context
/// ignored; per-class professors against the resolved class rate. The same
/// allocator rules apply as for invoices: settled periods are skipped, funds
/// never overcommit a period's remaining, and excess is left unapplied.
pub fn plan_salary_payment(
    catalog: &CatalogSnapshot,
    ledger: &SalaryLedger,
    professor: ProfessorId,
    class: Option<ClassId>,
    periods: &[Period],
    amount: Money,
) -> DomainResult<SalaryPaymentPlan> {
    let ctx = catalog.compensation(professor, class)?;
    let scope = match ctx.mode {
        CompensationMode::Monthly => None,
        CompensationMode::PerClass => class,
    };
    let outcome = allocate(periods, amount, |period| {
        ctx.rate
            .sub_clamped(ledger.credited_total(professor, scope, period))
    })?;

    let batch = BatchId::new();
    let drafts: Vec<SalaryDraft> = outcome
        .allocations
        .iter()
        .map(|a| SalaryDraft {
            professor,
            class: scope,
            period: a.period,
            required_base_amount: ctx.rate,
            advances_amount: Money::ZERO,
            settled_amount: a.applied,
            status: a.status,
            batch,
        })
        .collect();

    if outcome.has_unapplied() {
        tracing::warn!(
            %professor,
            unapplied = %outcome.unapplied,
            "payout exceeds total remaining; excess not applied"
        );
    }
    tracing::debug!(
        %professor,
        %batch,
        drafts = drafts.len(),
        applied = %outcome.applied_total(),
        "planned salary payout"
    );

    Ok(SalaryPaymentPlan {
        batch,
        drafts,
        unapplied: outcome.unapplied,
    })
}
