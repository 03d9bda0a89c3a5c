//! Catalog domain module: courses, class groups, rosters and professors.
//!
//! This crate models the source-of-truth lookups the reconciliation engine
//! consumes (course price, class monthly price, roster fee/rate overrides,
//! professor base amount and compensation mode) plus the two resolvers that
//! collapse them into a single fee or pay rate. Pure domain logic: no IO, no
//! HTTP, no storage.

pub mod compensation;
pub mod fees;
pub mod professor;
pub mod snapshot;

pub use compensation::CompensationContext;
pub use professor::{CompensationMode, DEFAULT_COMPENSATION_MODE, Professor};
pub use snapshot::{Assignment, CatalogSnapshot, ClassGroup, Course, Enrollment};
