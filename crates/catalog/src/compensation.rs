//! Compensation Resolver: a professor's pay rate, monthly or per-class.

use serde::{Deserialize, Serialize};

use eduledger_core::{ClassId, DomainError, DomainResult, Money, ProfessorId};

use crate::professor::CompensationMode;
use crate::snapshot::CatalogSnapshot;

/// Resolved compensation for one professor, optionally scoped to a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationContext {
    pub mode: CompensationMode,
    /// The required base amount per period under `mode`.
    pub rate: Money,
}

impl CatalogSnapshot {
    /// Resolve a professor's pay rate.
    ///
    /// Monthly mode ignores the class context entirely: the rate is the
    /// professor's base amount. Per-class mode resolves, in order: the class's
    /// uniform per-class rate, the legacy per-professor override on the class
    /// roster, and finally the class monthly price. A zero value at either
    /// override falls through to the next source; legacy data used zero and
    /// empty interchangeably for "no rate set".
    ///
    /// An unset or unrecognized mode resolves as monthly
    /// ([`crate::DEFAULT_COMPENSATION_MODE`]).
    pub fn compensation(
        &self,
        professor: ProfessorId,
        class: Option<ClassId>,
    ) -> DomainResult<CompensationContext> {
        let prof = self.professor(professor)?;

        let (mode, rate) = match prof.effective_mode() {
            CompensationMode::Monthly => (CompensationMode::Monthly, prof.base_amount),
            CompensationMode::PerClass => {
                let class_id = class.ok_or_else(|| {
                    DomainError::validation("per-class professor requires a class")
                })?;
                let class = self.class(class_id)?;
                let rate = class
                    .per_class_rate
                    .filter(|r| !r.is_zero())
                    .or_else(|| {
                        class
                            .assignment(professor)
                            .and_then(|a| a.pay_override)
                            .filter(|r| !r.is_zero())
                    })
                    .or(class.monthly_price)
                    .unwrap_or(Money::ZERO);
                (CompensationMode::PerClass, rate)
            }
        };

        if rate.is_negative() {
            return Err(DomainError::validation(format!(
                "resolved pay rate is negative for professor {professor}"
            )));
        }
        Ok(CompensationContext { mode, rate })
    }
}
