//! Access policy gate.
//!
//! A pure decision over (principal, route policy). No storage access: the
//! principal's status is whatever the presented access token says, so a
//! status change becomes visible when the token is refreshed.

use crate::common::{OnboardingError, OnboardingResult, Role, VendorId, VendorStatus};
use crate::domains::auth::jwt::Claims;

/// Authenticated caller, decoded from an access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: VendorId,
    pub email: String,
    pub role: Role,
    pub status: Option<VendorStatus>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            status: claims.status,
        }
    }
}

/// Roles a route admits. Empty means any authenticated role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    allowed_roles: Vec<Role>,
}

impl RoutePolicy {
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }

    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }
}

/// Decide whether `principal` may use a route guarded by `policy`.
///
/// Vendors must be approved for every gated route, even when `vendor` is in
/// the allowed set.
pub fn authorize(principal: Option<&Principal>, policy: &RoutePolicy) -> OnboardingResult<()> {
    let Some(principal) = principal else {
        return Err(OnboardingError::Forbidden("No user in request".to_string()));
    };

    if !policy.allowed_roles.is_empty() && !policy.allowed_roles.contains(&principal.role) {
        return Err(OnboardingError::Forbidden(
            "You do not have permission".to_string(),
        ));
    }

    if principal.role == Role::Vendor && principal.status != Some(VendorStatus::Approved) {
        let status = principal
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(OnboardingError::Forbidden(format!(
            "Access denied. Status: {}",
            status
        )));
    }

    Ok(())
}
