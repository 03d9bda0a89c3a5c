//! Step-up verification guard.
//!
//! Protected actions need a grant: issued to one actor for one action, valid
//! for fifteen minutes, consumed on first use.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use eduledger_core::ActorId;

use crate::permissions::{ActionKey, PermissionMatrix};

/// Validity window of a step-up grant.
pub const GRANT_VALIDITY_MINUTES: i64 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("action '{0}' requires step-up verification")]
    VerificationRequired(String),

    #[error("grant does not cover actor/action")]
    GrantMismatch,

    #[error("grant expired")]
    GrantExpired,

    #[error("grant already used")]
    GrantAlreadyUsed,
}

/// A single-use verification grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepUpGrant {
    pub id: Uuid,
    pub actor: ActorId,
    pub action: ActionKey,
    pub issued_at: DateTime<Utc>,
    pub used: bool,
}

impl StepUpGrant {
    pub fn issue(actor: ActorId, action: ActionKey, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            actor,
            action,
            issued_at: now,
            used: false,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + TimeDelta::minutes(GRANT_VALIDITY_MINUTES)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Authorization guard over a permission matrix.
///
/// Pure policy check: no IO, no panics. Callers persist the consumed grant
/// state themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guard {
    matrix: PermissionMatrix,
}

impl Guard {
    pub fn new(matrix: PermissionMatrix) -> Self {
        Self { matrix }
    }

    /// Check an action for an actor.
    ///
    /// Actions the matrix does not protect pass outright. Protected actions
    /// need a matching, unexpired, unused grant; on success the grant is
    /// marked used.
    pub fn check(
        &self,
        actor: ActorId,
        action: &ActionKey,
        grant: Option<&mut StepUpGrant>,
        now: DateTime<Utc>,
    ) -> Result<(), AuthzError> {
        if !self.matrix.requires_verification(action) {
            return Ok(());
        }
        let grant = match grant {
            Some(grant) => grant,
            None => return Err(AuthzError::VerificationRequired(action.to_string())),
        };
        if grant.actor != actor || &grant.action != action {
            return Err(AuthzError::GrantMismatch);
        }
        if grant.used {
            return Err(AuthzError::GrantAlreadyUsed);
        }
        if grant.is_expired(now) {
            return Err(AuthzError::GrantExpired);
        }
        grant.used = true;
        tracing::debug!(%actor, %action, grant = %grant.id, "step-up grant consumed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> Guard {
        Guard::new(PermissionMatrix::default_policy())
    }

    fn delete_key() -> ActionKey {
        ActionKey::parse("invoice.delete").unwrap()
    }

    #[test]
    fn unprotected_action_passes_without_a_grant() {
        let actor = ActorId::new();
        let action = ActionKey::parse("invoice.create").unwrap();
        assert!(guard().check(actor, &action, None, Utc::now()).is_ok());
    }

    #[test]
    fn protected_action_without_grant_is_rejected() {
        let actor = ActorId::new();
        let err = guard()
            .check(actor, &delete_key(), None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AuthzError::VerificationRequired(_)));
    }

    #[test]
    fn matching_grant_passes_and_is_consumed() {
        let actor = ActorId::new();
        let now = Utc::now();
        let mut grant = StepUpGrant::issue(actor, delete_key(), now);

        assert!(guard().check(actor, &delete_key(), Some(&mut grant), now).is_ok());
        assert!(grant.used);

        // Second use of the same grant is rejected.
        let err = guard()
            .check(actor, &delete_key(), Some(&mut grant), now)
            .unwrap_err();
        assert_eq!(err, AuthzError::GrantAlreadyUsed);
    }

    #[test]
    fn grant_for_another_actor_or_action_is_rejected() {
        let actor = ActorId::new();
        let now = Utc::now();

        let mut other_actor = StepUpGrant::issue(ActorId::new(), delete_key(), now);
        assert_eq!(
            guard()
                .check(actor, &delete_key(), Some(&mut other_actor), now)
                .unwrap_err(),
            AuthzError::GrantMismatch
        );

        let mut other_action =
            StepUpGrant::issue(actor, ActionKey::parse("salary.delete").unwrap(), now);
        assert_eq!(
            guard()
                .check(actor, &delete_key(), Some(&mut other_action), now)
                .unwrap_err(),
            AuthzError::GrantMismatch
        );
    }

    #[test]
    fn grant_expires_after_fifteen_minutes() {
        let actor = ActorId::new();
        let issued = Utc::now();
        let mut grant = StepUpGrant::issue(actor, delete_key(), issued);

        let just_inside = issued + TimeDelta::minutes(GRANT_VALIDITY_MINUTES) - TimeDelta::seconds(1);
        let just_outside = issued + TimeDelta::minutes(GRANT_VALIDITY_MINUTES);
        assert!(!grant.is_expired(just_inside));
        assert_eq!(
            guard()
                .check(actor, &delete_key(), Some(&mut grant), just_outside)
                .unwrap_err(),
            AuthzError::GrantExpired
        );
        // An expired grant is never consumed.
        assert!(!grant.used);
    }
}
