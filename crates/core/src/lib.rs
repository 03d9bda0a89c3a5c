//! `eduledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, fixed-point money, billing periods, settlement status
//! derivation and the generic payment allocator shared by billing and payroll.

pub mod allocation;
pub mod error;
pub mod id;
pub mod money;
pub mod period;
pub mod status;
pub mod value_object;

pub use allocation::{Allocation, AllocationOutcome, allocate};
pub use error::{DomainError, DomainResult};
pub use id::{ActorId, BatchId, ClassId, CourseId, ProfessorId, RecordId, StudentId};
pub use money::Money;
pub use period::Period;
pub use status::{SettlementStatus, ZERO_REQUIRED_STATUS, derive_status};
pub use value_object::ValueObject;
