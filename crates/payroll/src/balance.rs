//! Remaining Balance Calculator for salary statements.

use serde::{Deserialize, Serialize};

use eduledger_catalog::{CatalogSnapshot, CompensationMode};
use eduledger_core::{ClassId, DomainError, DomainResult, Money, Period, ProfessorId};

use crate::statement::SalaryStatement;

/// Snapshot of the salary ledger as of one reconciliation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryLedger {
    pub statements: Vec<SalaryStatement>,
}

impl SalaryLedger {
    /// Total credited (settled + advances) for one professor scope.
    ///
    /// `class == None` matches only class-less (monthly) statements; a class
    /// id matches only statements for that class.
    pub fn credited_total(
        &self,
        professor: ProfessorId,
        class: Option<ClassId>,
        period: Period,
    ) -> Money {
        self.statements
            .iter()
            .filter(|s| s.professor == professor && s.class == class && s.period == period)
            .map(|s| s.credited())
            .sum()
    }

    /// Outstanding pay for one period under the professor's resolved rate:
    /// `max(0, base − Σ(settled + advances))` over the matching scope.
    pub fn remaining(
        &self,
        catalog: &CatalogSnapshot,
        professor: ProfessorId,
        class: Option<ClassId>,
        period: Period,
    ) -> DomainResult<Money> {
        let ctx = catalog.compensation(professor, class)?;
        let scope = match ctx.mode {
            CompensationMode::Monthly => None,
            CompensationMode::PerClass => class,
        };
        Ok(ctx
            .rate
            .sub_clamped(self.credited_total(professor, scope, period)))
    }

    /// Periods still carrying outstanding pay, ascending.
    ///
    /// Monthly professors are owed from their joining month through `through`;
    /// per-class professors follow the class's billable range.
    pub fn unpaid_periods(
        &self,
        catalog: &CatalogSnapshot,
        professor: ProfessorId,
        class: Option<ClassId>,
        through: Period,
    ) -> DomainResult<Vec<Period>> {
        let ctx = catalog.compensation(professor, class)?;
        let candidates = match ctx.mode {
            CompensationMode::Monthly => {
                let prof = catalog.professor(professor)?;
                match prof.since {
                    Some(since) => Period::range_inclusive(since, through),
                    None => vec![through],
                }
            }
            CompensationMode::PerClass => {
                let class_id = class.ok_or_else(|| {
                    DomainError::validation("per-class professor requires a class")
                })?;
                catalog.class(class_id)?.billable_periods(through)
            }
        };

        let mut unpaid = Vec::new();
        for period in candidates {
            if self
                .remaining(catalog, professor, class, period)?
                .is_positive()
            {
                unpaid.push(period);
            }
        }
        Ok(unpaid)
    }
}
