//! Billing domain module: student invoices and payment planning.
//!
//! Deterministic business rules only: how much a student still owes per
//! period and how a lump payment turns into invoice drafts. No IO, no HTTP,
//! no storage; persistence (and its locking) belongs to the caller.

pub mod balance;
pub mod invoice;
pub mod planner;

pub use balance::InvoiceLedger;
pub use invoice::{InvoiceRecord, TaxCode};
pub use planner::{InvoiceDraft, InvoicePaymentPlan, plan_invoice_payment};
