//! `eduledger-auth` — authorization boundary for mutating operations.
//!
//! Pure policy: no IO, no storage, no transport. Callers check the guard
//! before persisting create/update/delete; the engine crates never call it
//! themselves.

pub mod guard;
pub mod permissions;

pub use guard::{AuthzError, GRANT_VALIDITY_MINUTES, Guard, StepUpGrant};
pub use permissions::{ActionKey, PermissionMatrix};
