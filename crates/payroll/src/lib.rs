//! Payroll domain module: salary statements and payout planning.
//!
//! Mirrors the billing crate for the professor side of the ledger: how much a
//! professor is still owed (monthly or per-class) and how a lump payout turns
//! into salary statement drafts. Pure domain logic, no IO.

pub mod balance;
pub mod planner;
pub mod statement;

pub use balance::SalaryLedger;
pub use planner::{SalaryDraft, SalaryPaymentPlan, plan_salary_payment};
pub use statement::SalaryStatement;
