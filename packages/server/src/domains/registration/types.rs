//! Registration domain data types

use chrono::{DateTime, Utc};
use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::common::{Role, VerificationMethod};
use crate::domains::vendor::models::{Address, CompanyInfo, ContactDetails, DocumentsUpload};

/// Where the code went and until when it is valid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStarted {
    pub identifier: String,
    pub method: VerificationMethod,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerified {
    pub identifier: String,
    pub method: VerificationMethod,
}

/// Everything submitted on the final registration step
#[derive(Debug, Clone, TypedBuilder)]
pub struct RegistrationSubmission {
    pub company_info: CompanyInfo,
    pub contact_details: ContactDetails,
    pub address: Address,
    #[builder(setter(into))]
    pub password: String,
    /// Client-declared role; `None` means vendor
    #[builder(default)]
    pub role: Option<Role>,
    #[builder(default)]
    pub documents: DocumentsUpload,
}
