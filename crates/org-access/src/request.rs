//! Permission requests
//!
//! Callers describe what they need as a map from resource to actions. Two
//! field names exist for the same thing: the legacy singular `permission` and
//! the current plural `permissions`. A raw request must carry exactly one of
//! them; [`PermissionRequest::try_from`] enforces that and produces the
//! canonical form used by the evaluator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AccessError;
use crate::permissions::Permission;

/// Required actions keyed by resource name.
///
/// Action lists keep duplicates; they do not change the outcome.
pub type ResourceActions = BTreeMap<String, Vec<String>>;

/// Request as it arrives from a caller, before shape validation.
///
/// # Example
///
/// ```
/// use org_access::{PermissionRequest, RawPermissionRequest};
///
/// let raw: RawPermissionRequest =
///     serde_json::from_str(r#"{ "permissions": { "member": ["create"] } }"#).unwrap();
/// let request = PermissionRequest::try_from(raw).unwrap();
/// assert!(!request.is_legacy());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPermissionRequest {
    /// Legacy singular shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<ResourceActions>,

    /// Current plural shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<ResourceActions>,
}

/// A validated permission request.
///
/// Both variants mean the same thing; the tag only records which field the
/// caller used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequest {
    /// Supplied through the legacy `permission` field.
    Legacy(ResourceActions),
    /// Supplied through the current `permissions` field.
    Current(ResourceActions),
}

impl PermissionRequest {
    /// Create a request in the current shape.
    pub fn new(actions: ResourceActions) -> Self {
        Self::Current(actions)
    }

    /// Create a request in the legacy shape.
    pub fn legacy(actions: ResourceActions) -> Self {
        Self::Legacy(actions)
    }

    /// Build a current-shape request from `(resource, actions)` pairs.
    ///
    /// Repeated resources append to the same action list.
    ///
    /// # Example
    ///
    /// ```
    /// use org_access::PermissionRequest;
    ///
    /// let request = PermissionRequest::from_pairs([
    ///     ("users", vec!["create"]),
    ///     ("docs", vec!["update"]),
    /// ]);
    /// assert_eq!(request.required_tokens().len(), 2);
    /// ```
    pub fn from_pairs<I, R, A, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, A)>,
        R: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut actions = ResourceActions::new();
        for (resource, list) in pairs {
            actions
                .entry(resource.into())
                .or_default()
                .extend(list.into_iter().map(Into::into));
        }
        Self::Current(actions)
    }

    /// The resource to actions mapping, regardless of shape.
    pub fn actions(&self) -> &ResourceActions {
        match self {
            Self::Legacy(actions) | Self::Current(actions) => actions,
        }
    }

    /// Check if the request came through the legacy field.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Flatten into required tokens, duplicates preserved.
    pub fn required_tokens(&self) -> Vec<Permission> {
        self.actions()
            .iter()
            .flat_map(|(resource, actions)| {
                actions
                    .iter()
                    .map(move |action| Permission::new(resource.as_str(), action.as_str()))
            })
            .collect()
    }
}

impl TryFrom<RawPermissionRequest> for PermissionRequest {
    type Error = AccessError;

    fn try_from(raw: RawPermissionRequest) -> Result<Self, Self::Error> {
        match (raw.permission, raw.permissions) {
            (None, Some(actions)) => Ok(Self::Current(actions)),
            (Some(actions), None) => Ok(Self::Legacy(actions)),
            (Some(_), Some(_)) => Err(AccessError::AmbiguousRequest),
            (None, None) => Err(AccessError::MissingRequest),
        }
    }
}

impl From<PermissionRequest> for RawPermissionRequest {
    fn from(request: PermissionRequest) -> Self {
        match request {
            PermissionRequest::Legacy(actions) => Self {
                permission: Some(actions),
                permissions: None,
            },
            PermissionRequest::Current(actions) => Self {
                permission: None,
                permissions: Some(actions),
            },
        }
    }
}
