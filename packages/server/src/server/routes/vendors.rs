//! Registration and vendor lookup endpoints.

use axum::extract::multipart::Field;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Multipart, Path, Query};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{
    OnboardingError, OnboardingResult, Role, VendorId, VendorStatus, VerificationMethod,
};
use crate::domains::auth::Principal;
use crate::domains::registration::activities;
use crate::domains::registration::RegistrationSubmission;
use crate::domains::vendor::activities as vendor_queries;
use crate::domains::vendor::models::{
    Address, CompanyInfo, ContactDetails, DocumentsUpload, StoredDocument,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct StartRegistrationRequest {
    pub email: Option<String>,
    #[serde(alias = "phoneNumber", alias = "PhoneNumber")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    #[serde(alias = "phoneNumber", alias = "PhoneNumber")]
    pub phone: Option<String>,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ListVendorsQuery {
    pub status: Option<String>,
}

fn channel_name(method: VerificationMethod) -> &'static str {
    match method {
        VerificationMethod::Email => "email",
        VerificationMethod::Sms => "phone",
    }
}

/// POST /vendors/start-registration
pub async fn start_registration_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<StartRegistrationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|e| OnboardingError::invalid_input(e.body_text()))?;
    let started = activities::start_registration(
        body.email.as_deref(),
        body.phone.as_deref(),
        &state.deps,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("OTP sent to {}", channel_name(started.method)),
        "data": started,
    })))
}

/// POST /vendors/verify-otp
pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|e| OnboardingError::invalid_input(e.body_text()))?;
    let verified = activities::verify_otp(
        body.email.as_deref(),
        body.phone.as_deref(),
        &body.otp,
        &state.deps,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP verified successfully",
        "data": verified,
    })))
}

/// POST /vendors/complete-registration (multipart)
pub async fn complete_registration_handler(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let submission = read_submission(multipart).await?;
    let profile = activities::complete_registration(submission, &state.deps).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Vendor registered successfully",
        "data": profile,
    })))
}

/// GET /vendors/:id
///
/// Vendors may only read their own profile.
pub async fn get_vendor_handler(
    Extension(state): Extension<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = VendorId::parse(&id)
        .map_err(|_| OnboardingError::invalid_input("vendor id must be a UUID"))?;
    if principal.role == Role::Vendor && principal.user_id != id {
        return Err(OnboardingError::Forbidden("You do not have permission".to_string()).into());
    }

    let profile = vendor_queries::get_vendor(id, &state.deps).await?;
    Ok(Json(json!({ "success": true, "data": profile })))
}

/// GET /vendors?status=
pub async fn list_vendors_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListVendorsQuery>,
) -> Result<Json<Value>, ApiError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<VendorStatus>)
        .transpose()
        .map_err(OnboardingError::InvalidInput)?;

    let vendors = vendor_queries::list_vendors(status, &state.deps).await?;
    Ok(Json(json!({ "success": true, "data": vendors })))
}

// =============================================================================
// Multipart parsing
// =============================================================================

#[derive(Default)]
struct SubmissionParts {
    company_info: Option<CompanyInfo>,
    contact_details: Option<ContactDetails>,
    address: Option<Address>,
    password: Option<String>,
    role: Option<Role>,
    documents: DocumentsUpload,
}

/// Text parts are JSON strings (`CompanyInfo`, `ContactDetails`, `Address`)
/// or plain values (`password`, `role`); file parts fill the document slots.
/// Unknown parts are ignored.
async fn read_submission(mut multipart: Multipart) -> OnboardingResult<RegistrationSubmission> {
    let mut parts = SubmissionParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OnboardingError::invalid_input(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "CompanyInfo" => parts.company_info = Some(json_part(&name, field).await?),
            "ContactDetails" => parts.contact_details = Some(json_part(&name, field).await?),
            "Address" => parts.address = Some(json_part(&name, field).await?),
            "password" => parts.password = Some(text_part(field).await?),
            "role" => {
                let raw = text_part(field).await?;
                if !raw.trim().is_empty() {
                    parts.role = Some(raw.parse().map_err(OnboardingError::InvalidInput)?);
                }
            }
            "GstCertificate" => parts.documents.gst_certificate = file_part(field).await?,
            "PanCard" => parts.documents.pan_card = file_part(field).await?,
            "ShopActLicence" => parts.documents.shop_act_licence = file_part(field).await?,
            "AdditionalDocument" => parts.documents.additional_document = file_part(field).await?,
            _ => {}
        }
    }

    let missing = |field: &str| OnboardingError::invalid_input(format!("{} is required", field));
    Ok(RegistrationSubmission::builder()
        .company_info(parts.company_info.ok_or_else(|| missing("CompanyInfo"))?)
        .contact_details(parts.contact_details.ok_or_else(|| missing("ContactDetails"))?)
        .address(parts.address.ok_or_else(|| missing("Address"))?)
        .password(parts.password.ok_or_else(|| missing("password"))?)
        .role(parts.role)
        .documents(parts.documents)
        .build())
}

async fn text_part(field: Field<'_>) -> OnboardingResult<String> {
    field
        .text()
        .await
        .map_err(|e| OnboardingError::invalid_input(e.body_text()))
}

async fn json_part<T: DeserializeOwned>(name: &str, field: Field<'_>) -> OnboardingResult<T> {
    let raw = text_part(field).await?;
    serde_json::from_str(&raw)
        .map_err(|e| OnboardingError::invalid_input(format!("{} must be valid JSON: {}", name, e)))
}

/// An empty upload counts as no upload
async fn file_part(field: Field<'_>) -> OnboardingResult<Option<StoredDocument>> {
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| OnboardingError::invalid_input(e.body_text()))?;
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(StoredDocument {
        data: data.to_vec(),
        content_type,
    }))
}
