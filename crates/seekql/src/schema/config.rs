//! Registry configuration.

use serde::{Deserialize, Serialize};

use super::field::FieldKind;

/// Suggestion page size used when a field does not declare its own.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Which field kinds accept the membership operators `in` and `not in`.
///
/// Enum fields always accept membership; relation fields never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipPolicy {
    /// Membership on every scalar kind.
    #[default]
    AnyScalar,
    /// Membership on enum and boolean fields only.
    EnumerableOnly,
}

impl MembershipPolicy {
    /// Returns `true` if `in`/`not in` may be used on a field of this kind.
    pub fn allows(self, kind: &FieldKind) -> bool {
        match kind {
            FieldKind::Enum { .. } => true,
            FieldKind::Relation { .. } => false,
            FieldKind::Boolean => true,
            _ => self == MembershipPolicy::AnyScalar,
        }
    }
}

/// Settings applied while building a [`Registry`](super::Registry).
///
/// Every key is optional when deserializing:
///
/// ```yaml
/// default_page_size: 50
/// membership: enumerable_only
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub default_page_size: usize,
    pub membership: MembershipPolicy,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            default_page_size: DEFAULT_PAGE_SIZE,
            membership: MembershipPolicy::default(),
        }
    }
}
