//! Receipts module: presentation-time views over persisted invoice records.
//!
//! Read-only over the ledger: decomposing tax-inclusive amounts into
//! net/VAT/gross and clustering the records of one allocator run into a
//! single logical transaction for display and printing.

pub mod grouping;
pub mod vat;

pub use grouping::{
    FALLBACK_BUCKET_MILLIS, GroupingHint, GroupingHints, HINT_RETENTION_HOURS, ReceiptGroup,
    group_receipts,
};
pub use vat::{TaxSummary, VatBreakdown};
