//! Role definitions and the built-in organization roles
//!
//! A role definition may declare its grants under the current `permissions`
//! field, the older `permission` field, or both. [`RoleDefinition::grants`]
//! folds them into one [`ResourcePermissionSet`] so nothing downstream ever
//! looks at the legacy field.

use serde::{Deserialize, Serialize};

use crate::permissions::ResourcePermissionSet;

/// Every resource/action pair the built-in roles know about.
///
/// | Resource       | Actions                          |
/// |----------------|----------------------------------|
/// | `organization` | update, delete                   |
/// | `member`       | create, update, delete           |
/// | `invitation`   | create, cancel                   |
/// | `team`         | create, update, delete           |
/// | `ac`           | create, read, update, delete     |
pub fn default_statements() -> ResourcePermissionSet {
    ResourcePermissionSet::new()
        .grant("organization", ["update", "delete"])
        .grant("member", ["create", "update", "delete"])
        .grant("invitation", ["create", "cancel"])
        .grant("team", ["create", "update", "delete"])
        .grant("ac", ["create", "read", "update", "delete"])
}

/// Built-in role within an organization.
///
/// Used when the caller does not supply its own role registry.
///
/// - **Member**: may read access-control definitions
/// - **Admin**: manages members, invitations, teams and access control, and
///   may update the organization
/// - **Owner**: everything an admin can do, plus deleting the organization
///
/// # Examples
///
/// ```
/// use org_access::DefaultRole;
///
/// let owner = DefaultRole::Owner.grants();
/// assert!(owner.allows("organization", "delete"));
///
/// let admin = DefaultRole::Admin.grants();
/// assert!(admin.allows("organization", "update"));
/// assert!(!admin.allows("organization", "delete"));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DefaultRole {
    /// Full organization control
    Owner,

    /// Manages members, invitations and teams
    Admin,

    /// Regular member
    Member,
}

impl DefaultRole {
    /// All built-in roles.
    pub fn all() -> [Self; 3] {
        [Self::Owner, Self::Admin, Self::Member]
    }

    /// Role assigned to the user who creates an organization.
    pub fn creator_role() -> Self {
        Self::Owner
    }

    /// Permissions granted by this role.
    pub fn grants(&self) -> ResourcePermissionSet {
        match self {
            Self::Owner => default_statements(),
            Self::Admin => ResourcePermissionSet::new()
                .grant("organization", ["update"])
                .grant("member", ["create", "update", "delete"])
                .grant("invitation", ["create", "cancel"])
                .grant("team", ["create", "update", "delete"])
                .grant("ac", ["create", "read", "update", "delete"]),
            Self::Member => ResourcePermissionSet::new()
                .grant("organization", Vec::<String>::new())
                .grant("member", Vec::<String>::new())
                .grant("invitation", Vec::<String>::new())
                .grant("team", Vec::<String>::new())
                .grant("ac", ["read"]),
        }
    }

    /// Parse role from string representation.
    ///
    /// Matching is exact; role identifiers are case-sensitive everywhere else
    /// in this crate too.
    ///
    /// # Examples
    ///
    /// ```
    /// use org_access::DefaultRole;
    ///
    /// assert_eq!(DefaultRole::parse("admin"), Some(DefaultRole::Admin));
    /// assert_eq!(DefaultRole::parse("Admin"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Admin => "Admin",
            Self::Member => "Member",
        }
    }
}

impl Default for DefaultRole {
    fn default() -> Self {
        Self::Member
    }
}

/// Declarative definition of a role's grants, as supplied by the caller.
///
/// # Examples
///
/// ```
/// use org_access::RoleDefinition;
///
/// let def: RoleDefinition = serde_json::from_str(
///     r#"{ "permissions": { "team": ["create"] }, "permission": { "team": ["delete"] } }"#,
/// ).unwrap();
///
/// let grants = def.grants();
/// assert!(grants.allows("team", "create"));
/// assert!(grants.allows("team", "delete"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Grants declared under the current field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<ResourcePermissionSet>,

    /// Grants declared under the legacy field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<ResourcePermissionSet>,
}

impl RoleDefinition {
    /// Create a definition using the current field name.
    pub fn new(permissions: ResourcePermissionSet) -> Self {
        Self {
            permissions: Some(permissions),
            permission: None,
        }
    }

    /// Create a definition using the legacy field name.
    pub fn legacy(permission: ResourcePermissionSet) -> Self {
        Self {
            permissions: None,
            permission: Some(permission),
        }
    }

    /// Canonical grants: the union of both fields.
    pub fn grants(&self) -> ResourcePermissionSet {
        let mut grants = ResourcePermissionSet::new();
        for declared in [&self.permissions, &self.permission].into_iter().flatten() {
            grants.union(declared);
        }
        grants
    }
}

impl From<ResourcePermissionSet> for RoleDefinition {
    fn from(permissions: ResourcePermissionSet) -> Self {
        Self::new(permissions)
    }
}
