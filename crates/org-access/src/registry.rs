//! # Role Registry
//!
//! Read-only mapping from role identifier to the permissions that role
//! grants. Registries are built by the caller and never mutated during
//! evaluation.
//!
//! [`SharedRegistry`] supports hot reloading: it swaps the whole registry
//! behind an `Arc`, so an evaluation holding a snapshot keeps seeing the same
//! roles until it finishes.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::AccessResult;
use crate::permissions::ResourcePermissionSet;
use crate::roles::{DefaultRole, RoleDefinition};

static EMPTY_GRANTS: ResourcePermissionSet = ResourcePermissionSet::EMPTY;

static BUILTIN: Lazy<RoleRegistry> = Lazy::new(|| {
    DefaultRole::all()
        .into_iter()
        .fold(RoleRegistry::new(), |registry, role| {
            registry.with_role(role.as_str(), role.grants())
        })
});

/// Mapping from role identifier to granted permissions.
///
/// # Example
///
/// ```
/// use org_access::{RoleRegistry, ResourcePermissionSet};
///
/// let registry = RoleRegistry::new()
///     .with_role("admin", ResourcePermissionSet::new().grant("users", ["create", "delete"]))
///     .with_role("editor", ResourcePermissionSet::new().grant("docs", ["update"]));
///
/// assert!(registry.lookup("admin").allows("users", "delete"));
/// assert!(registry.lookup("ghost").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, RoleDefinition>",
    into = "BTreeMap<String, RoleDefinition>"
)]
pub struct RoleRegistry {
    roles: HashMap<String, ResourcePermissionSet>,
}

impl RoleRegistry {
    /// Create an empty registry. Every lookup resolves to no grants.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registry of [`DefaultRole`]s.
    pub fn builtin() -> &'static RoleRegistry {
        &BUILTIN
    }

    /// Add or replace a role, builder style.
    pub fn with_role(mut self, name: impl Into<String>, grants: ResourcePermissionSet) -> Self {
        self.roles.insert(name.into(), grants);
        self
    }

    /// Add or replace a role from a declarative definition.
    ///
    /// Legacy and current grant fields are folded together here.
    pub fn with_definition(self, name: impl Into<String>, definition: &RoleDefinition) -> Self {
        self.with_role(name, definition.grants())
    }

    /// Layer another registry over this one.
    ///
    /// Roles in `overrides` replace same-named roles in `self`.
    pub fn overlay(mut self, overrides: RoleRegistry) -> Self {
        self.roles.extend(overrides.roles);
        self
    }

    /// Parse role definitions from JSON.
    ///
    /// The document is an object keyed by role name; each value may carry
    /// `permissions`, `permission`, or both.
    ///
    /// # Example
    ///
    /// ```
    /// use org_access::RoleRegistry;
    ///
    /// let registry = RoleRegistry::from_json(r#"{
    ///     "editor": { "permissions": { "docs": ["update"] } },
    ///     "legacy": { "permission": { "docs": ["read"] } }
    /// }"#).unwrap();
    ///
    /// assert!(registry.lookup("editor").allows("docs", "update"));
    /// assert!(registry.lookup("legacy").allows("docs", "read"));
    /// ```
    pub fn from_json(json: &str) -> AccessResult<Self> {
        let registry: RoleRegistry = serde_json::from_str(json)?;
        tracing::info!(roles = registry.len(), "Loaded role definitions");
        Ok(registry)
    }

    /// Get the grants for a role.
    ///
    /// Unknown roles resolve to the empty set.
    pub fn lookup(&self, role: &str) -> &ResourcePermissionSet {
        self.roles.get(role).unwrap_or(&EMPTY_GRANTS)
    }

    /// Get the grants for a role, or `None` if it is not defined.
    pub fn get(&self, role: &str) -> Option<&ResourcePermissionSet> {
        self.roles.get(role)
    }

    /// Check if a role is defined.
    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Defined role names, sorted.
    pub fn role_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of defined roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if no roles are defined.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl From<BTreeMap<String, RoleDefinition>> for RoleRegistry {
    fn from(definitions: BTreeMap<String, RoleDefinition>) -> Self {
        definitions
            .iter()
            .fold(RoleRegistry::new(), |registry, (name, def)| {
                registry.with_definition(name.clone(), def)
            })
    }
}

impl From<RoleRegistry> for BTreeMap<String, RoleDefinition> {
    fn from(registry: RoleRegistry) -> Self {
        registry
            .roles
            .into_iter()
            .map(|(name, grants)| (name, RoleDefinition::new(grants)))
            .collect()
    }
}

/// A registry that can be replaced while evaluations are running.
///
/// Readers take a snapshot with [`SharedRegistry::snapshot`]; writers swap in
/// a complete new registry with [`SharedRegistry::replace`]. The version
/// counter increments on every swap and is suitable as part of a cache key.
///
/// # Example
///
/// ```
/// use org_access::{SharedRegistry, RoleRegistry, ResourcePermissionSet};
///
/// let shared = SharedRegistry::new(RoleRegistry::new());
/// let before = shared.snapshot();
///
/// shared.replace(RoleRegistry::new().with_role("ops", ResourcePermissionSet::new().grant("team", ["update"])));
///
/// assert!(!before.contains("ops"));
/// assert!(shared.snapshot().contains("ops"));
/// assert_eq!(shared.version(), 1);
/// ```
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<RoleRegistry>>,
    version: AtomicU64,
}

impl SharedRegistry {
    /// Wrap a registry for shared use.
    pub fn new(registry: RoleRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
            version: AtomicU64::new(0),
        }
    }

    /// Get the current registry.
    ///
    /// The returned snapshot is unaffected by later calls to `replace`.
    pub fn snapshot(&self) -> Arc<RoleRegistry> {
        self.current.read().clone()
    }

    /// Replace the registry, returning the new version.
    pub fn replace(&self, registry: RoleRegistry) -> u64 {
        let roles = registry.len();
        let mut current = self.current.write();
        *current = Arc::new(registry);
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        drop(current);

        tracing::info!(version, roles, "Role registry replaced");
        version
    }

    /// Number of times the registry has been replaced.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(RoleRegistry::builtin().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unknown_role_is_empty() {
        let registry = RoleRegistry::new();
        assert!(registry.lookup("ghost").is_empty());
        assert!(registry.get("ghost").is_none());
        assert!(!registry.contains("ghost"));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = RoleRegistry::builtin();
        assert_eq!(registry.role_names(), vec!["admin", "member", "owner"]);
        assert!(registry.lookup("owner").allows("organization", "delete"));
        assert!(registry.lookup("member").allows("ac", "read"));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        let registry = RoleRegistry::builtin();
        assert!(registry.lookup("Owner").is_empty());
    }

    #[test]
    fn test_with_role_replaces() {
        let registry = RoleRegistry::new()
            .with_role("ops", ResourcePermissionSet::new().grant("team", ["create"]))
            .with_role("ops", ResourcePermissionSet::new().grant("team", ["delete"]));

        assert_eq!(registry.len(), 1);
        assert!(!registry.lookup("ops").allows("team", "create"));
        assert!(registry.lookup("ops").allows("team", "delete"));
    }

    #[test]
    fn test_overlay() {
        let custom = RoleRegistry::new()
            .with_role("member", ResourcePermissionSet::new().grant("team", ["create"]))
            .with_role("auditor", ResourcePermissionSet::new().grant("ac", ["read"]));

        let registry = RoleRegistry::builtin().clone().overlay(custom);

        assert_eq!(registry.len(), 4);
        assert!(registry.lookup("member").allows("team", "create"));
        assert!(!registry.lookup("member").allows("ac", "read"));
        assert!(registry.lookup("owner").allows("organization", "delete"));
    }

    #[test]
    fn test_from_json_unions_legacy_field() {
        let registry = RoleRegistry::from_json(
            r#"{
                "mixed": {
                    "permissions": { "docs": ["read"] },
                    "permission": { "docs": ["update"], "users": ["create"] }
                }
            }"#,
        )
        .unwrap();

        let grants = registry.lookup("mixed");
        assert!(grants.allows("docs", "read"));
        assert!(grants.allows("docs", "update"));
        assert!(grants.allows("users", "create"));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = RoleRegistry::from_json(r#"{ "admin": { "permissions": ["create"] } }"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ROLE_DEFINITIONS");
    }

    #[test]
    fn test_serde_roundtrip_preserves_grants() {
        let registry = RoleRegistry::builtin().clone();
        let json = serde_json::to_string(&registry).unwrap();
        let restored = RoleRegistry::from_json(&json).unwrap();
        assert_eq!(restored, registry);
    }

    #[test]
    fn test_shared_registry_snapshot_isolation() {
        let shared = SharedRegistry::default();
        let snapshot = shared.snapshot();
        assert_eq!(shared.version(), 0);

        let version = shared.replace(RoleRegistry::new());
        assert_eq!(version, 1);

        assert_eq!(snapshot.len(), 3);
        assert!(shared.snapshot().is_empty());
    }
}
