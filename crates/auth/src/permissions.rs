use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use eduledger_core::{DomainError, DomainResult};

/// Action identifier in `entity.action` form (e.g. "invoice.create",
/// "salary.delete").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(Cow<'static, str>);

impl ActionKey {
    /// Parse and validate an action key: exactly two non-empty segments
    /// separated by a dot.
    pub fn parse(key: impl Into<Cow<'static, str>>) -> DomainResult<Self> {
        let key = key.into();
        let mut parts = key.splitn(2, '.');
        let entity = parts.next().unwrap_or("");
        let action = parts.next().unwrap_or("");
        if entity.is_empty() || action.is_empty() || action.contains('.') {
            return Err(DomainError::validation(format!(
                "action key must be 'entity.action', got '{key}'"
            )));
        }
        Ok(Self(key))
    }

    /// Known-valid key, for building the static matrix.
    pub(crate) const fn well_known(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn entity(&self) -> &str {
        self.0.split('.').next().unwrap_or("")
    }

    pub fn action(&self) -> &str {
        self.0.split('.').nth(1).unwrap_or("")
    }
}

impl core::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which actions require step-up verification before they go through.
///
/// An action absent from the matrix does not require verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    entries: HashMap<ActionKey, bool>,
}

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in policy: deletions and record confirmation are step-up
    /// protected; routine creates and edits are not.
    pub fn default_policy() -> Self {
        let mut matrix = Self::new();
        for key in [
            "invoice.delete",
            "invoice.confirm",
            "salary.delete",
            "salary.confirm",
            "student.delete",
            "professor.delete",
            "class.delete",
        ] {
            matrix.entries.insert(ActionKey::well_known(key), true);
        }
        for key in [
            "invoice.create",
            "invoice.update",
            "salary.create",
            "salary.update",
        ] {
            matrix.entries.insert(ActionKey::well_known(key), false);
        }
        matrix
    }

    pub fn set(&mut self, action: ActionKey, requires_verification: bool) {
        self.entries.insert(action, requires_verification);
    }

    pub fn requires_verification(&self, action: &ActionKey) -> bool {
        self.entries.get(action).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_segment_keys() {
        let key = ActionKey::parse("invoice.delete").unwrap();
        assert_eq!(key.entity(), "invoice");
        assert_eq!(key.action(), "delete");
        assert_eq!(key.to_string(), "invoice.delete");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["", "invoice", "invoice.", ".delete", "a.b.c"] {
            assert!(ActionKey::parse(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn absent_action_does_not_require_verification() {
        let matrix = PermissionMatrix::default_policy();
        let key = ActionKey::parse("report.view").unwrap();
        assert!(!matrix.requires_verification(&key));
    }

    #[test]
    fn default_policy_protects_deletions() {
        let matrix = PermissionMatrix::default_policy();
        assert!(matrix.requires_verification(&ActionKey::parse("invoice.delete").unwrap()));
        assert!(matrix.requires_verification(&ActionKey::parse("salary.delete").unwrap()));
        assert!(!matrix.requires_verification(&ActionKey::parse("invoice.create").unwrap()));
    }

    #[test]
    fn set_overrides_the_default() {
        let mut matrix = PermissionMatrix::default_policy();
        let key = ActionKey::parse("invoice.create").unwrap();
        matrix.set(key.clone(), true);
        assert!(matrix.requires_verification(&key));
    }
}
