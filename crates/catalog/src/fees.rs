//! Fee Resolver: what a student owes per period in a class.

use eduledger_core::{ClassId, DomainError, DomainResult, Money, StudentId};

use crate::snapshot::CatalogSnapshot;

impl CatalogSnapshot {
    /// Resolve a student's monthly fee in a class.
    ///
    /// Priority: (1) the student's roster fee override when present (an
    /// explicit zero counts); (2) the class monthly price; (3) the course
    /// price. When every source is absent the fee is zero and the caller must
    /// treat the period as trivially settled.
    ///
    /// A negative resolved fee is rejected before any balance is computed.
    pub fn monthly_fee(&self, student: StudentId, class: ClassId) -> DomainResult<Money> {
        let class = self.class(class)?;

        let fee = class
            .enrollment(student)
            .and_then(|e| e.monthly_fee)
            .or(class.monthly_price)
            .or_else(|| self.course(class.course).and_then(|c| c.price))
            .unwrap_or(Money::ZERO);

        if fee.is_negative() {
            return Err(DomainError::validation(format!(
                "resolved fee is negative for student {student} in class {}",
                class.id
            )));
        }
        Ok(fee)
    }
}
