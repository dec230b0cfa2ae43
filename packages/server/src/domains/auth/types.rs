//! Auth domain data types
//!
//! Simple, serializable types returned by auth activities.

use serde::Serialize;

use crate::domains::vendor::models::VendorProfile;

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub user: VendorProfile,
}

/// Result of exchanging a refresh token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResult {
    pub access_token: String,
}
