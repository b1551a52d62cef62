//! # Organization Access
//!
//! Role-based permission evaluation for organization memberships.
//!
//! ## Overview
//!
//! The org-access crate answers one question: do an actor's roles grant
//! every permission a request demands? It handles:
//! - **Roles**: Named bundles of per-resource grants ([`RoleRegistry`])
//! - **Requests**: Required actions per resource ([`PermissionRequest`])
//! - **Evaluation**: Union of role grants, conjunctive check ([`PermissionEvaluator`])
//!
//! Role assignment, authentication and enforcement live elsewhere. This crate
//! only returns yes or no.
//!
//! ## Architecture
//!
//! ```text
//! Permission token = resource:action
//!
//! role "admin,member"
//!   ├─ admin  ─→ { member: [create, update, delete], ... }
//!   └─ member ─→ { ac: [read] }
//!            ▼ union
//!   { member:create, member:update, member:delete, ..., ac:read }
//!            ▼ contains all of
//!   request { member: [create] }  ─→  true
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use org_access::{PermissionEvaluator, PermissionRequest, RoleRegistry, ResourcePermissionSet};
//!
//! let registry = RoleRegistry::new()
//!     .with_role("admin", ResourcePermissionSet::new().grant("users", ["create", "delete"]))
//!     .with_role("editor", ResourcePermissionSet::new().grant("docs", ["update"]));
//!
//! let evaluator = PermissionEvaluator::new(&registry);
//! let request = PermissionRequest::from_pairs([("users", ["create"]), ("docs", ["update"])]);
//!
//! assert!(evaluator.evaluate("admin,editor", &request));
//! assert!(!evaluator.evaluate("editor", &request));
//! ```
//!
//! ## Semantics
//!
//! - Unknown roles grant nothing
//! - Every requested token must be granted; there is no "any" mode
//! - A request with no actions is satisfied
//! - Requests carry exactly one of `permission` (legacy) or `permissions`;
//!   both or neither is an [`AccessError`], never a silent `false`
//! - Role definitions may use either field name; both are unioned
//!
//! ## Built-in Roles
//!
//! When no registry is supplied, [`RoleRegistry::builtin`] provides `owner`,
//! `admin` and `member` (see [`DefaultRole`]).

pub mod config;
pub mod error;
pub mod evaluator;
pub mod permissions;
pub mod registry;
pub mod request;
pub mod roles;

// Re-export main types for convenience
pub use config::{AccessConfig, ConfigError};
pub use error::{AccessError, AccessResult};
pub use evaluator::{
    explain_permission, has_permission, AccessOptions, Decision, HasPermissionInput,
    PermissionEvaluator,
};
pub use permissions::{Permission, PermissionSet, ResourcePermissionSet};
pub use registry::{RoleRegistry, SharedRegistry};
pub use request::{PermissionRequest, RawPermissionRequest, ResourceActions};
pub use roles::{default_statements, DefaultRole, RoleDefinition};
