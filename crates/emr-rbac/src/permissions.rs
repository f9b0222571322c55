//! # Permissions
//!
//! Core permission types and sets for the RBAC system.
//! A permission combines a resource type with an action; its canonical
//! textual form is `{resource}_{action}` (e.g. `MedicalRecord_read`).
//!
//! Permission sets travel over the wire in two shapes, both of which must
//! round-trip losslessly:
//!
//! - flat list: `["MedicalRecord_create", "MedicalRecord_read"]`
//! - grouped map: `{"MedicalRecord": "create,read"}`
//!
//! [`PermissionsWire`] is the single normalization point where either shape
//! becomes the one in-memory [`PermissionSet`].

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::actions::Action;

/// Errors raised when parsing permission strings or wire shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The string is not of the form `{resource}_{action}`.
    #[error("malformed permission string: {0:?}")]
    Malformed(String),

    /// The action token is not part of the fixed action vocabulary.
    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    /// The resource type is empty.
    #[error("empty resource type")]
    EmptyResource,
}

/// A permission is a combination of resource type and action.
///
/// Resource types are open-ended strings owned by the upstream service
/// (e.g. `MedicalRecord`, `Invoice`); actions come from the fixed
/// [`Action`] vocabulary.
///
/// # Example
///
/// ```
/// use emr_rbac::{Action, Permission};
///
/// let perm = Permission::new("MedicalRecord", Action::Read);
/// assert_eq!(perm.to_string(), "MedicalRecord_read");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// The resource type this permission applies to.
    pub resource: String,
    /// The action allowed on the resource.
    pub action: Action,
}

impl Permission {
    /// Create a new permission.
    ///
    /// # Arguments
    ///
    /// * `resource` - The resource type (must be non-empty)
    /// * `action` - The action allowed
    pub fn new(resource: impl Into<String>, action: Action) -> Self {
        Self {
            resource: resource.into(),
            action,
        }
    }

    /// Parse a permission from its canonical form (e.g. `MedicalRecord_read`).
    ///
    /// The action is the segment after the *last* underscore, so resource
    /// types containing underscores parse correctly. Action tokens are
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// [`PermissionError::Malformed`] when there is no underscore or the
    /// action segment is empty, [`PermissionError::EmptyResource`] when the
    /// resource segment is empty, and [`PermissionError::UnknownAction`]
    /// when the action is not in the fixed vocabulary.
    ///
    /// # Example
    ///
    /// ```
    /// use emr_rbac::{Action, Permission};
    ///
    /// let perm = Permission::parse("MedicalRecord_read").unwrap();
    /// assert_eq!(perm.resource, "MedicalRecord");
    /// assert_eq!(perm.action, Action::Read);
    /// ```
    pub fn parse(s: &str) -> Result<Self, PermissionError> {
        let (resource, action) = s
            .rsplit_once('_')
            .ok_or_else(|| PermissionError::Malformed(s.to_string()))?;

        if resource.is_empty() {
            return Err(PermissionError::EmptyResource);
        }
        if action.is_empty() {
            return Err(PermissionError::Malformed(s.to_string()));
        }

        let action =
            Action::parse(action).ok_or_else(|| PermissionError::UnknownAction(action.to_string()))?;

        Ok(Self::new(resource, action))
    }

    /// Get the canonical key (`{resource}_{action}`).
    pub fn key(&self) -> String {
        format!("{}_{}", self.resource, self.action.as_str())
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.resource, self.action.as_str())
    }
}

/// A set of permissions that can be assigned to roles or users.
///
/// Uses internal canonical-string representation for efficient storage and
/// membership tests: the authorization engine probes the set with a
/// formatted `{resource}_{action}` key without constructing a `Permission`.
///
/// # Example
///
/// ```
/// use emr_rbac::{Action, Permission, PermissionSet};
///
/// let mut set = PermissionSet::new();
/// set.insert(Permission::new("MedicalRecord", Action::Read));
/// set.insert(Permission::new("MedicalRecord", Action::Create));
///
/// assert!(set.contains_key("MedicalRecord_read"));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    /// The permissions in this set, keyed by canonical string.
    permissions: HashSet<String>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission to the set.
    pub fn insert(&mut self, permission: Permission) {
        self.permissions.insert(permission.key());
    }

    /// Add multiple permissions to the set.
    pub fn insert_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        for perm in permissions {
            self.insert(perm);
        }
    }

    /// Add a permission by its canonical key.
    ///
    /// The caller guarantees the key is well-formed; stores that track
    /// grants as keys use this to avoid a parse round-trip.
    pub fn insert_key(&mut self, key: &str) {
        self.permissions.insert(key.to_string());
    }

    /// Remove a permission from the set.
    ///
    /// Removing a permission that is not present is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(&permission.key())
    }

    /// Remove a permission by its canonical key.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove_key(&mut self, key: &str) -> bool {
        self.permissions.remove(key)
    }

    /// Check if the set contains a permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(&permission.key())
    }

    /// Check membership by canonical key (e.g. `MedicalRecord_read`).
    ///
    /// This is the RBAC probe used by the authorization engine: unknown
    /// resource or action strings are ordinary keys that are simply absent.
    pub fn contains_key(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }

    /// Get all permissions in the set.
    ///
    /// Entries that were inserted through typed APIs always parse back;
    /// order is unspecified.
    pub fn all(&self) -> Vec<Permission> {
        self.permissions
            .iter()
            .filter_map(|s| Permission::parse(s).ok())
            .collect()
    }

    /// Merge another permission set into this one (set union).
    pub fn union(&mut self, other: &PermissionSet) {
        for perm in &other.permissions {
            self.permissions.insert(perm.clone());
        }
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Build from the flat wire shape (a list of canonical strings).
    ///
    /// # Errors
    ///
    /// Returns the first [`PermissionError`] encountered; nothing about the
    /// input order affects the resulting set.
    pub fn from_flat<I, S>(keys: I) -> Result<Self, PermissionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for key in keys {
            set.insert(Permission::parse(key.as_ref())?);
        }
        Ok(set)
    }

    /// Serialize to the flat wire shape, sorted for deterministic output.
    pub fn to_flat(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.permissions.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Build from the grouped wire shape (`resource` → comma-joined actions).
    ///
    /// Action tokens are case-insensitive and surrounding whitespace is
    /// trimmed; empty tokens between commas are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use emr_rbac::PermissionSet;
    /// use std::collections::BTreeMap;
    ///
    /// let mut grouped = BTreeMap::new();
    /// grouped.insert("MedicalRecord".to_string(), "Create, READ".to_string());
    /// let set = PermissionSet::from_grouped(&grouped).unwrap();
    /// assert!(set.contains_key("MedicalRecord_create"));
    /// assert!(set.contains_key("MedicalRecord_read"));
    /// ```
    pub fn from_grouped<K, V>(groups: impl IntoIterator<Item = (K, V)>) -> Result<Self, PermissionError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        for (resource, actions) in groups {
            let resource = resource.as_ref();
            if resource.is_empty() {
                return Err(PermissionError::EmptyResource);
            }
            for token in actions.as_ref().split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let action = Action::parse(token)
                    .ok_or_else(|| PermissionError::UnknownAction(token.to_string()))?;
                set.insert(Permission::new(resource, action));
            }
        }
        Ok(set)
    }

    /// Serialize to the grouped wire shape.
    ///
    /// Resources are emitted in lexicographic order and actions in the
    /// canonical [`Action::all`] order, so equal sets always produce equal
    /// grouped maps.
    pub fn to_grouped(&self) -> BTreeMap<String, String> {
        let mut by_resource: BTreeMap<String, Vec<Action>> = BTreeMap::new();
        for perm in self.all() {
            by_resource.entry(perm.resource).or_default().push(perm.action);
        }

        by_resource
            .into_iter()
            .map(|(resource, actions)| {
                let joined = Action::all()
                    .iter()
                    .filter(|a| actions.contains(a))
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                (resource, joined)
            })
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        let mut set = PermissionSet::new();
        for perm in iter {
            set.insert(perm);
        }
        set
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_flat().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = PermissionsWire::deserialize(deserializer)?;
        wire.normalize().map_err(serde::de::Error::custom)
    }
}

/// Wire shapes accepted for permission sets.
///
/// The upstream service sends permissions sometimes as a flat array and
/// sometimes as a resource-to-actions map; this enum is the ingestion
/// boundary that turns either into the canonical [`PermissionSet`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PermissionsWire {
    /// Flat list: `["MedicalRecord_create", "MedicalRecord_read"]`
    Flat(Vec<String>),
    /// Grouped map: `{"MedicalRecord": "create,read"}`
    Grouped(BTreeMap<String, String>),
}

impl PermissionsWire {
    /// Normalize either wire shape into a [`PermissionSet`].
    pub fn normalize(self) -> Result<PermissionSet, PermissionError> {
        match self {
            PermissionsWire::Flat(keys) => PermissionSet::from_flat(keys),
            PermissionsWire::Grouped(groups) => PermissionSet::from_grouped(groups),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_creation() {
        let perm = Permission::new("MedicalRecord", Action::Read);
        assert_eq!(perm.to_string(), "MedicalRecord_read");
        assert_eq!(perm.key(), "MedicalRecord_read");
    }

    #[test]
    fn test_permission_parsing() {
        let perm = Permission::parse("MedicalRecord_read").unwrap();
        assert_eq!(perm.resource, "MedicalRecord");
        assert_eq!(perm.action, Action::Read);

        // Action is taken after the last underscore.
        let perm = Permission::parse("Staff_Profile_update").unwrap();
        assert_eq!(perm.resource, "Staff_Profile");
        assert_eq!(perm.action, Action::Update);

        // Action tokens are case-insensitive.
        let perm = Permission::parse("Invoice_READ").unwrap();
        assert_eq!(perm.action, Action::Read);
    }

    #[test]
    fn test_permission_parsing_errors() {
        assert_eq!(
            Permission::parse("MedicalRecord"),
            Err(PermissionError::Malformed("MedicalRecord".to_string()))
        );
        assert_eq!(
            Permission::parse("_read"),
            Err(PermissionError::EmptyResource)
        );
        assert_eq!(
            Permission::parse("MedicalRecord_"),
            Err(PermissionError::Malformed("MedicalRecord_".to_string()))
        );
        assert_eq!(
            Permission::parse("MedicalRecord_destroy"),
            Err(PermissionError::UnknownAction("destroy".to_string()))
        );
    }

    #[test]
    fn test_permission_set() {
        let mut set = PermissionSet::new();
        set.insert(Permission::new("MedicalRecord", Action::Read));
        set.insert(Permission::new("MedicalRecord", Action::Create));

        assert!(set.contains(&Permission::new("MedicalRecord", Action::Read)));
        assert!(set.contains_key("MedicalRecord_create"));
        assert!(!set.contains_key("MedicalRecord_delete"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_permission_set_remove_is_noop_when_absent() {
        let mut set = PermissionSet::new();
        set.insert(Permission::new("Invoice", Action::Read));

        assert!(!set.remove(&Permission::new("Invoice", Action::Delete)));
        assert_eq!(set.len(), 1);

        assert!(set.remove(&Permission::new("Invoice", Action::Read)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_permission_set_union() {
        let mut set1 = PermissionSet::from_flat(["Invoice_read"]).unwrap();
        let set2 = PermissionSet::from_flat(["Invoice_create", "Invoice_read"]).unwrap();

        set1.union(&set2);
        assert_eq!(set1.len(), 2);
    }

    #[test]
    fn test_flat_round_trip() {
        let set =
            PermissionSet::from_flat(["MedicalRecord_read", "MedicalRecord_create", "Invoice_read"])
                .unwrap();

        let flat = set.to_flat();
        assert_eq!(
            flat,
            vec!["Invoice_read", "MedicalRecord_create", "MedicalRecord_read"]
        );
        assert_eq!(PermissionSet::from_flat(&flat).unwrap(), set);
    }

    #[test]
    fn test_grouped_round_trip() {
        let set =
            PermissionSet::from_flat(["MedicalRecord_read", "MedicalRecord_create", "Invoice_read"])
                .unwrap();

        let grouped = set.to_grouped();
        assert_eq!(grouped.get("MedicalRecord").unwrap(), "create,read");
        assert_eq!(grouped.get("Invoice").unwrap(), "read");

        assert_eq!(PermissionSet::from_grouped(&grouped).unwrap(), set);
    }

    #[test]
    fn test_shapes_agree_regardless_of_order() {
        let flat = PermissionSet::from_flat(["VitalSigns_update", "VitalSigns_create", "VitalSigns_read"])
            .unwrap();

        let mut grouped = BTreeMap::new();
        grouped.insert("VitalSigns".to_string(), "READ , update,Create".to_string());
        let from_grouped = PermissionSet::from_grouped(&grouped).unwrap();

        assert_eq!(flat, from_grouped);
        assert_eq!(flat.to_grouped(), from_grouped.to_grouped());
    }

    #[test]
    fn test_grouped_rejects_unknown_action() {
        let mut grouped = BTreeMap::new();
        grouped.insert("Invoice".to_string(), "read,destroy".to_string());
        assert_eq!(
            PermissionSet::from_grouped(&grouped),
            Err(PermissionError::UnknownAction("destroy".to_string()))
        );
    }

    #[test]
    fn test_deserialize_either_shape() {
        let from_flat: PermissionSet =
            serde_json::from_str(r#"["MedicalRecord_create","MedicalRecord_read"]"#).unwrap();
        let from_grouped: PermissionSet =
            serde_json::from_str(r#"{"MedicalRecord":"create,read"}"#).unwrap();

        assert_eq!(from_flat, from_grouped);
    }

    #[test]
    fn test_serialize_as_flat_list() {
        let set = PermissionSet::from_flat(["Invoice_read", "Invoice_create"]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Invoice_create","Invoice_read"]"#);
    }
}
