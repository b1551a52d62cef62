//! # Permissions
//!
//! Permission tokens, per-resource grant maps and the flattened token sets
//! used for the final satisfaction check.
//!
//! Resources and actions are opaque strings. A token is always qualified by
//! its resource, so `member:create` never satisfies a demand for
//! `team:create`. Tokens compare as (resource, action) pairs; the
//! `resource:action` rendering is for display only.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// A single (resource, action) permission token.
///
/// # Example
///
/// ```
/// use org_access::Permission;
///
/// let perm = Permission::new("member", "create");
/// assert_eq!(perm.to_string(), "member:create");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission {
    /// The resource this permission applies to.
    pub resource: String,
    /// The action allowed on the resource.
    pub action: String,
}

impl Permission {
    /// Create a new permission token.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Mapping from resource name to the set of actions granted on it.
///
/// This is the canonical grant representation of a role. Action order is
/// irrelevant and duplicates collapse.
///
/// # Example
///
/// ```
/// use org_access::ResourcePermissionSet;
///
/// let grants = ResourcePermissionSet::new()
///     .grant("member", ["create", "update"])
///     .grant("invitation", ["create"]);
///
/// assert!(grants.allows("member", "update"));
/// assert!(!grants.allows("member", "delete"));
/// assert_eq!(grants.tokens().count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcePermissionSet {
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl ResourcePermissionSet {
    /// The empty grant set. Unknown roles resolve to this.
    pub const EMPTY: ResourcePermissionSet = ResourcePermissionSet {
        grants: BTreeMap::new(),
    };

    /// Create an empty grant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant actions on a resource, builder style.
    pub fn grant<I, S>(mut self, resource: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(resource, actions);
        self
    }

    /// Grant actions on a resource.
    ///
    /// A resource listed with no actions is kept but grants nothing.
    pub fn insert<I, S>(&mut self, resource: impl Into<String>, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants
            .entry(resource.into())
            .or_default()
            .extend(actions.into_iter().map(Into::into));
    }

    /// Union another grant set into this one.
    pub fn union(&mut self, other: &ResourcePermissionSet) {
        for (resource, actions) in &other.grants {
            self.insert(resource.clone(), actions.iter().cloned());
        }
    }

    /// Actions granted on a resource, if the resource is listed.
    pub fn actions(&self, resource: &str) -> Option<&BTreeSet<String>> {
        self.grants.get(resource)
    }

    /// Check whether a single action on a resource is granted.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.grants
            .get(resource)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Resource names listed in this set.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.grants.keys().map(String::as_str)
    }

    /// Flatten into permission tokens.
    pub fn tokens(&self) -> impl Iterator<Item = Permission> + '_ {
        self.grants.iter().flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |action| Permission::new(resource.clone(), action.clone()))
        })
    }

    /// Check if no action is granted on any resource.
    pub fn is_empty(&self) -> bool {
        self.grants.values().all(BTreeSet::is_empty)
    }
}

/// A flat set of permission tokens.
///
/// Produced by aggregating the grants of every resolved role. Membership is
/// structural on the (resource, action) pair, so names containing `:` cannot
/// collide.
///
/// # Example
///
/// ```
/// use org_access::{Permission, PermissionSet};
///
/// let mut set = PermissionSet::new();
/// set.add(Permission::new("member", "create"));
/// set.add(Permission::new("member", "create"));
///
/// assert!(set.has(&Permission::new("member", "create")));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        for perm in permissions {
            self.add(perm);
        }
    }

    /// Add every token granted by a resource grant map.
    pub fn add_grants(&mut self, grants: &ResourcePermissionSet) {
        self.add_all(grants.tokens());
    }

    /// Check if the set contains an exact permission token.
    ///
    /// There is no wildcard or implication between actions: `manage` does
    /// not imply `read` unless both are granted.
    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Check if every permission in `required` is in this set.
    ///
    /// An empty `required` list is always satisfied.
    pub fn contains_all<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        required.into_iter().all(|perm| self.has(perm))
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        let mut set = PermissionSet::new();
        set.add_all(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_display() {
        let perm = Permission::new("organization", "update");
        assert_eq!(perm.to_string(), "organization:update");
    }

    #[test]
    fn test_resource_permission_set_dedup() {
        let grants = ResourcePermissionSet::new()
            .grant("member", ["create", "create", "update"])
            .grant("member", ["update"]);

        assert_eq!(grants.actions("member").map(BTreeSet::len), Some(2));
        assert_eq!(grants.tokens().count(), 2);
    }

    #[test]
    fn test_resource_permission_set_union() {
        let mut a = ResourcePermissionSet::new().grant("member", ["create"]);
        let b = ResourcePermissionSet::new()
            .grant("member", ["delete"])
            .grant("team", ["update"]);

        a.union(&b);
        assert!(a.allows("member", "create"));
        assert!(a.allows("member", "delete"));
        assert!(a.allows("team", "update"));
        assert_eq!(a.resources().collect::<Vec<_>>(), vec!["member", "team"]);
    }

    #[test]
    fn test_resource_with_no_actions_is_empty() {
        let grants = ResourcePermissionSet::new().grant("member", Vec::<String>::new());
        assert!(grants.is_empty());
        assert_eq!(grants.tokens().count(), 0);
        assert!(ResourcePermissionSet::EMPTY.is_empty());
    }

    #[test]
    fn test_tokens_are_resource_qualified() {
        let mut set = PermissionSet::new();
        set.add_grants(&ResourcePermissionSet::new().grant("member", ["create"]));

        assert!(set.has(&Permission::new("member", "create")));
        assert!(!set.has(&Permission::new("team", "create")));
    }

    #[test]
    fn test_colons_in_names_do_not_collide() {
        let mut set = PermissionSet::new();
        set.add_grants(&ResourcePermissionSet::new().grant("a", ["b:c"]));

        // Both render as "a:b:c"
        assert_eq!(Permission::new("a", "b:c").to_string(), "a:b:c");
        assert_eq!(Permission::new("a:b", "c").to_string(), "a:b:c");

        assert!(set.has(&Permission::new("a", "b:c")));
        assert!(!set.has(&Permission::new("a:b", "c")));
        assert!(!set.contains_all([&Permission::new("a:b", "c")]));
    }

    #[test]
    fn test_contains_all() {
        let set: PermissionSet = [
            Permission::new("docs", "read"),
            Permission::new("docs", "update"),
        ]
        .into_iter()
        .collect();

        let read = Permission::new("docs", "read");
        let write = Permission::new("docs", "write");

        assert!(set.contains_all([&read]));
        assert!(set.contains_all([&read, &read]));
        assert!(!set.contains_all([&read, &write]));
        assert!(set.contains_all(std::iter::empty()));
        assert!(PermissionSet::new().contains_all(std::iter::empty()));
    }
}
