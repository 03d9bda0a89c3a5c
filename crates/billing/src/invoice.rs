//! Invoice ledger records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eduledger_core::{
    BatchId, ClassId, DomainError, DomainResult, Money, Period, RecordId, SettlementStatus,
    StudentId, derive_status,
};

/// Tax treatment of an invoice's settled amount (which is tax-inclusive).
///
/// The legacy ledger stored these as `none`/`vat8`/`vat18`/`exempt`; the
/// aliases keep old rows deserializable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxCode {
    None,
    #[serde(alias = "vat8")]
    Reduced,
    #[serde(alias = "vat18")]
    Standard,
    Exempt,
}

/// One invoice row in the ledger.
///
/// Several records may exist for the same (student, class, period), e.g.
/// successive top-ups, so the amount owed for a period is always a sum over
/// matching records, never a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: RecordId,
    pub student: StudentId,
    pub class: ClassId,
    pub period: Period,
    pub required_amount: Money,
    pub settled_amount: Money,
    pub status: SettlementStatus,
    pub tax_code: TaxCode,
    /// Allocator run that produced this record. Always stamped on new records;
    /// `None` only on rows predating batch identifiers.
    pub batch: Option<BatchId>,
    /// Free-form note. Legacy rows carry JSON here (`{"batch_id": …}`) from
    /// before the explicit batch column existed.
    pub annotation: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InvoiceRecord {
    /// Validate the record invariants: `0 ≤ settled ≤ required` and a status
    /// consistent with the amounts.
    pub fn validate(&self) -> DomainResult<()> {
        if self.settled_amount.is_negative() {
            return Err(DomainError::invariant("settled amount must not be negative"));
        }
        if self.settled_amount > self.required_amount {
            return Err(DomainError::invariant(
                "settled amount must not exceed required amount",
            ));
        }
        if self.status != derive_status(self.settled_amount, self.required_amount) {
            return Err(DomainError::invariant(
                "status is inconsistent with settled/required amounts",
            ));
        }
        Ok(())
    }

    /// Reassign the settled amount, clamping it into `[0, required]` and
    /// recomputing the status.
    ///
    /// Returns `true` when the amount had to be clamped. Non-fatal; the
    /// caller may log it but must not abort.
    pub fn reassign_settlement(&mut self, settled: Money) -> bool {
        let clamped = settled.min(self.required_amount).max(Money::ZERO);
        self.settled_amount = clamped;
        self.status = derive_status(self.settled_amount, self.required_amount);
        clamped != settled
    }

    /// The grouping key for this record: the explicit batch id, or the legacy
    /// `batch_id` buried in the annotation JSON.
    ///
    /// Returned as a string because legacy batch ids were arbitrary text, not
    /// UUIDs.
    pub fn batch_key(&self) -> Option<String> {
        if let Some(batch) = self.batch {
            return Some(batch.to_string());
        }
        let annotation = self.annotation.as_deref()?;
        let value: serde_json::Value = serde_json::from_str(annotation).ok()?;
        value
            .get("batch_id")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
    }
}
