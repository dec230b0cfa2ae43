//! Builders for accounts and registration submissions.

use chrono::Utc;
use vendor_core::common::{Role, VendorId, VendorStatus};
use vendor_core::domains::registration::RegistrationSubmission;
use vendor_core::domains::vendor::models::{
    Address, CompanyInfo, ContactDetails, DocumentsUpload, StoredDocument, VendorAccount,
};
use vendor_core::kernel::test_dependencies::MockPasswordHasher;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn company_info(gst_number: &str) -> CompanyInfo {
    CompanyInfo {
        business_name: "Acme Traders".to_string(),
        gst_number: gst_number.to_string(),
        company_pan_card: "ABCDE1234F".to_string(),
        shop_act_licence: None,
        website_url: Some("https://acme.example".to_string()),
    }
}

pub fn contact_details(email: &str, phone: &str) -> ContactDetails {
    ContactDetails {
        persona_name: "Asha Rao".to_string(),
        email: email.to_string(),
        phone_number: phone.to_string(),
    }
}

pub fn address() -> Address {
    Address {
        street_address: "1 MG Road".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        postal_code: "411001".to_string(),
        country: "India".to_string(),
    }
}

pub fn pdf(contents: &str) -> StoredDocument {
    StoredDocument {
        data: contents.as_bytes().to_vec(),
        content_type: "application/pdf".to_string(),
    }
}

/// GST certificate and PAN card present
pub fn required_documents() -> DocumentsUpload {
    DocumentsUpload {
        gst_certificate: Some(pdf("gst certificate")),
        pan_card: Some(pdf("pan card")),
        shop_act_licence: None,
        additional_document: None,
    }
}

pub fn submission(email: &str, phone: &str, gst_number: &str) -> RegistrationSubmission {
    RegistrationSubmission::builder()
        .company_info(company_info(gst_number))
        .contact_details(contact_details(email, phone))
        .address(address())
        .password(TEST_PASSWORD)
        .documents(required_documents())
        .build()
}

/// An account as if registration had already completed
pub fn account(role: Role, status: VendorStatus, email: &str, phone: &str) -> VendorAccount {
    let now = Utc::now();
    VendorAccount {
        id: VendorId::new(),
        company_info: company_info(&format!("GST-{}", phone)),
        contact_details: contact_details(email, phone),
        address: address(),
        documents: required_documents(),
        password_hash: MockPasswordHasher::digest_of(TEST_PASSWORD),
        role,
        status,
        email_verified: true,
        refresh_token: None,
        products: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}
