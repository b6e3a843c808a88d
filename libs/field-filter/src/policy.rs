//! Removal policy compilation.
//!
//! Two flags resolve into one of four [`RemovalPolicy`] states once per
//! configuration load. The resulting policy is the per-value removal test.

use serde::{Deserialize, Serialize};

use crate::FieldValue;

/// Compiled field removal test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Nothing is removed and events are not walked.
    Disabled,
    /// Remove JSON `null` values.
    NullOnly,
    /// Remove empty strings.
    EmptyOnly,
    /// Remove JSON `null` values and empty strings.
    NullOrEmpty,
}

impl RemovalPolicy {
    /// Returns true when a field holding `value` should be cleared.
    ///
    /// [`FieldValue::Absent`] never matches, so reapplying a policy to an
    /// already filtered event changes nothing.
    pub fn matches(&self, value: &FieldValue) -> bool {
        match self {
            RemovalPolicy::Disabled => false,
            RemovalPolicy::NullOnly => value.is_null(),
            RemovalPolicy::EmptyOnly => is_empty(value),
            RemovalPolicy::NullOrEmpty => value.is_null() || is_empty(value),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, RemovalPolicy::Disabled)
    }

    /// The `(remove_null, remove_empty)` flags this policy was compiled from.
    pub fn flags(&self) -> (bool, bool) {
        match self {
            RemovalPolicy::Disabled => (false, false),
            RemovalPolicy::NullOnly => (true, false),
            RemovalPolicy::EmptyOnly => (false, true),
            RemovalPolicy::NullOrEmpty => (true, true),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::Disabled => "disabled",
            RemovalPolicy::NullOnly => "null_only",
            RemovalPolicy::EmptyOnly => "empty_only",
            RemovalPolicy::NullOrEmpty => "null_or_empty",
        }
    }
}

impl std::fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the two removal flags into a [`RemovalPolicy`].
///
/// # Example
/// ```
/// use edge_field_filter::{compile_policy, FieldValue, RemovalPolicy};
/// use serde_json::json;
///
/// let policy = compile_policy(true, false);
/// assert_eq!(policy, RemovalPolicy::NullOnly);
/// assert!(policy.matches(&FieldValue::from(json!(null))));
/// assert!(!policy.matches(&FieldValue::from(json!(""))));
/// ```
pub fn compile_policy(remove_null: bool, remove_empty: bool) -> RemovalPolicy {
    match (remove_null, remove_empty) {
        (false, false) => RemovalPolicy::Disabled,
        (true, false) => RemovalPolicy::NullOnly,
        (false, true) => RemovalPolicy::EmptyOnly,
        (true, true) => RemovalPolicy::NullOrEmpty,
    }
}

// Null and absent values are excluded before the string test.
fn is_empty(value: &FieldValue) -> bool {
    !value.is_null() && !value.is_absent() && value.is_empty_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_all_flag_combinations() {
        assert_eq!(compile_policy(false, false), RemovalPolicy::Disabled);
        assert_eq!(compile_policy(true, false), RemovalPolicy::NullOnly);
        assert_eq!(compile_policy(false, true), RemovalPolicy::EmptyOnly);
        assert_eq!(compile_policy(true, true), RemovalPolicy::NullOrEmpty);
    }

    #[test]
    fn test_flags_recompile_to_same_policy() {
        for policy in [
            RemovalPolicy::Disabled,
            RemovalPolicy::NullOnly,
            RemovalPolicy::EmptyOnly,
            RemovalPolicy::NullOrEmpty,
        ] {
            let (remove_null, remove_empty) = policy.flags();
            assert_eq!(compile_policy(remove_null, remove_empty), policy);
        }
    }

    #[test]
    fn test_absent_never_matches() {
        for policy in [
            RemovalPolicy::Disabled,
            RemovalPolicy::NullOnly,
            RemovalPolicy::EmptyOnly,
            RemovalPolicy::NullOrEmpty,
        ] {
            assert!(!policy.matches(&FieldValue::Absent), "{policy}");
        }
    }

    #[test]
    fn test_serializes_snake_case() {
        let encoded = serde_json::to_value(RemovalPolicy::NullOrEmpty).unwrap();
        assert_eq!(encoded, json!("null_or_empty"));
    }
}
