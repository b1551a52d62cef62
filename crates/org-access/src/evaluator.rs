//! # Permission Evaluator
//!
//! Decides whether an actor's roles grant every permission a request
//! demands.
//!
//! ```text
//! "admin,editor" ──split──▶ [admin, editor] ──lookup──▶ grants ──union──▶ PermissionSet
//!                                                                            │
//! { users: [create], docs: [update] } ──flatten──▶ [users:create, docs:update] ──all?──▶ bool
//! ```
//!
//! Satisfaction is strictly conjunctive. There is no "any of" mode; callers
//! that need one issue several evaluations and combine the results.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::AccessResult;
use crate::permissions::{Permission, PermissionSet};
use crate::registry::RoleRegistry;
use crate::request::{PermissionRequest, RawPermissionRequest};

/// Separator between role identifiers in a role assignment.
pub const ROLE_DELIMITER: char = ',';

/// Split a role assignment into role identifiers.
///
/// Identifiers are used verbatim: no trimming, no case folding. An empty
/// segment is just another unknown role.
///
/// # Example
///
/// ```
/// use org_access::evaluator::resolve_roles;
///
/// assert_eq!(resolve_roles("admin,member"), vec!["admin", "member"]);
/// assert_eq!(resolve_roles("admin, member"), vec!["admin", " member"]);
/// ```
pub fn resolve_roles(role_assignment: &str) -> Vec<&str> {
    role_assignment.split(ROLE_DELIMITER).collect()
}

/// Outcome of an evaluation, with the tokens that were not granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether every requested permission is granted.
    pub allowed: bool,
    /// Requested tokens the roles do not grant, deduplicated, in request
    /// order (resources sorted by name).
    pub missing: Vec<Permission>,
}

/// Evaluates permission requests against a role registry.
///
/// # Example
///
/// ```
/// use org_access::{PermissionEvaluator, PermissionRequest, RoleRegistry, ResourcePermissionSet};
///
/// let registry = RoleRegistry::new()
///     .with_role("admin", ResourcePermissionSet::new().grant("users", ["create", "delete"]))
///     .with_role("editor", ResourcePermissionSet::new().grant("docs", ["update"]));
/// let evaluator = PermissionEvaluator::new(&registry);
///
/// let both = PermissionRequest::from_pairs([("users", ["create"]), ("docs", ["update"])]);
/// assert!(evaluator.evaluate("admin,editor", &both));
///
/// let users = PermissionRequest::from_pairs([("users", ["create"])]);
/// assert!(!evaluator.evaluate("editor", &users));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    registry: &'a RoleRegistry,
}

impl<'a> PermissionEvaluator<'a> {
    /// Create an evaluator over a registry.
    pub fn new(registry: &'a RoleRegistry) -> Self {
        Self { registry }
    }

    /// Create an evaluator over the built-in roles.
    pub fn builtin() -> PermissionEvaluator<'static> {
        PermissionEvaluator::new(RoleRegistry::builtin())
    }

    /// The registry this evaluator reads.
    pub fn registry(&self) -> &'a RoleRegistry {
        self.registry
    }

    /// Union of the grants of every role in the assignment.
    ///
    /// Unknown roles contribute nothing.
    pub fn aggregate(&self, role_assignment: &str) -> PermissionSet {
        let mut granted = PermissionSet::new();
        for role in resolve_roles(role_assignment) {
            match self.registry.get(role) {
                Some(grants) => granted.add_grants(grants),
                None => tracing::trace!(role = %role, "Unknown role grants nothing"),
            }
        }
        granted
    }

    /// Evaluate a request and report which tokens are missing.
    pub fn explain(&self, role_assignment: &str, request: &PermissionRequest) -> Decision {
        let granted = self.aggregate(role_assignment);
        let required = request.required_tokens();

        let allowed = granted.contains_all(&required);
        let missing = if allowed {
            Vec::new()
        } else {
            let mut seen = HashSet::new();
            required
                .iter()
                .filter(|perm| !granted.has(perm) && seen.insert(*perm))
                .cloned()
                .collect()
        };

        let decision = Decision { allowed, missing };
        tracing::debug!(
            role = %role_assignment,
            requested = required.len(),
            legacy_request = request.is_legacy(),
            allowed = decision.allowed,
            "Evaluated permission request"
        );
        decision
    }

    /// Check whether the roles grant every requested permission.
    ///
    /// A request with no actions is always satisfied.
    pub fn evaluate(&self, role_assignment: &str, request: &PermissionRequest) -> bool {
        self.explain(role_assignment, request).allowed
    }

    /// Validate a raw request, then evaluate it.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AmbiguousRequest` when both request shapes are
    /// present and `AccessError::MissingRequest` when neither is. These are
    /// never reported as a plain `false`.
    pub fn evaluate_raw(
        &self,
        role_assignment: &str,
        request: RawPermissionRequest,
    ) -> AccessResult<bool> {
        let request = validate(request)?;
        Ok(self.evaluate(role_assignment, &request))
    }
}

fn validate(raw: RawPermissionRequest) -> AccessResult<PermissionRequest> {
    PermissionRequest::try_from(raw).map_err(|err| {
        tracing::warn!(code = err.error_code(), "Rejected malformed permission request");
        err
    })
}

/// Evaluation options supplied by the membership layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessOptions {
    /// Custom roles. When absent the built-in roles are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RoleRegistry>,
}

impl AccessOptions {
    /// Options using custom roles.
    pub fn with_roles(roles: RoleRegistry) -> Self {
        Self { roles: Some(roles) }
    }

    /// The registry to evaluate against.
    pub fn registry(&self) -> &RoleRegistry {
        self.roles.as_ref().unwrap_or_else(|| RoleRegistry::builtin())
    }
}

/// Input for [`has_permission`].
///
/// Deserializes from the membership layer's call shape:
///
/// ```json
/// { "role": "admin,member", "options": { "roles": { ... } }, "permissions": { "member": ["create"] } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HasPermissionInput {
    /// Comma-delimited role assignment.
    pub role: String,

    /// Evaluation options.
    #[serde(default)]
    pub options: AccessOptions,

    /// Requested permissions in either shape.
    #[serde(flatten)]
    pub request: RawPermissionRequest,
}

impl HasPermissionInput {
    /// Create an input using the built-in roles and the current request shape.
    pub fn new(role: impl Into<String>, request: PermissionRequest) -> Self {
        Self {
            role: role.into(),
            options: AccessOptions::default(),
            request: request.into(),
        }
    }

    /// Use custom roles instead of the built-in ones.
    pub fn with_roles(mut self, roles: RoleRegistry) -> Self {
        self.options = AccessOptions::with_roles(roles);
        self
    }
}

/// Check whether a member's role grants the requested permissions.
///
/// This is the entry point used by the organization membership layer.
///
/// # Errors
///
/// Fails only when the request carries both or neither of `permission` and
/// `permissions`.
///
/// # Example
///
/// ```
/// use org_access::{has_permission, HasPermissionInput};
///
/// let input: HasPermissionInput = serde_json::from_str(
///     r#"{ "role": "admin", "permissions": { "invitation": ["create"] } }"#,
/// ).unwrap();
/// assert!(has_permission(&input).unwrap());
///
/// let ambiguous: HasPermissionInput = serde_json::from_str(
///     r#"{ "role": "admin", "permission": {}, "permissions": {} }"#,
/// ).unwrap();
/// assert!(has_permission(&ambiguous).is_err());
/// ```
pub fn has_permission(input: &HasPermissionInput) -> AccessResult<bool> {
    PermissionEvaluator::new(input.options.registry())
        .evaluate_raw(&input.role, input.request.clone())
}

/// Like [`has_permission`], but reports which tokens are missing.
pub fn explain_permission(input: &HasPermissionInput) -> AccessResult<Decision> {
    let request = validate(input.request.clone())?;
    Ok(PermissionEvaluator::new(input.options.registry()).explain(&input.role, &request))
}
