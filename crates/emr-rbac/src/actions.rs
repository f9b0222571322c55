//! # Actions
//!
//! Defines the operations that can be performed on EMR resources.
//! The action vocabulary is fixed: the upstream services never invent
//! new verbs, they compose these six.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on EMR resources.
///
/// - **Create**: Create new resource instances
/// - **Read**: View resource data
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **Approve**: Approve pending records (e.g., prescriptions)
/// - **Export**: Download/export resource data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new resource.
    Create,

    /// Read/view resource.
    Read,

    /// Update existing resource.
    Update,

    /// Delete resource.
    ///
    /// Never derivable from CRUD shorthand; delete grants are always
    /// added explicitly.
    Delete,

    /// Approve pending records.
    Approve,

    /// Export resource data.
    Export,
}

impl Action {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// A static lowercase string, as used in canonical permission keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Approve => "approve",
            Action::Export => "export",
        }
    }

    /// Parse an action from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use emr_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("APPROVE"), Some(Action::Approve));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "approve" => Some(Action::Approve),
            "export" => Some(Action::Export),
            _ => None,
        }
    }

    /// Map a CRUD shorthand letter to an action.
    ///
    /// The role matrix is written in compact shorthand where
    /// `C` → Create, `R` → Read, `U` → Update and `A` → Approve.
    /// Any other letter maps to `None` and is ignored by expansion;
    /// in particular there is no letter for Delete or Export.
    ///
    /// # Example
    ///
    /// ```
    /// use emr_rbac::actions::Action;
    ///
    /// assert_eq!(Action::from_shorthand('C'), Some(Action::Create));
    /// assert_eq!(Action::from_shorthand('A'), Some(Action::Approve));
    /// assert_eq!(Action::from_shorthand('D'), None);
    /// ```
    pub fn from_shorthand(letter: char) -> Option<Self> {
        match letter {
            'C' => Some(Action::Create),
            'R' => Some(Action::Read),
            'U' => Some(Action::Update),
            'A' => Some(Action::Approve),
            _ => None,
        }
    }

    /// Get all actions, in canonical order.
    ///
    /// The order here is the order actions are emitted in grouped
    /// serialization, so it must stay stable.
    pub fn all() -> [Self; 6] {
        [
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::Approve,
            Action::Export,
        ]
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
