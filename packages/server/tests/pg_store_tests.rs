//! Postgres store tests.
//!
//! Run against a real database in a container:
//! `cargo test --test pg_store_tests -- --ignored`

mod common;

use chrono::{Duration, Utc};
use common::{fixtures, PgHarness};
use test_context::test_context;
use uuid::Uuid;
use vendor_core::common::{Role, VendorStatus, VerificationMethod};
use vendor_core::domains::registration::models::VerificationChallenge;
use vendor_core::domains::vendor::models::{InsertOutcome, VendorAccount};
use vendor_core::kernel::{
    BaseAccountStore, BaseChallengeStore, PostgresAccountStore, PostgresChallengeStore,
};

/// Contact values unique to one test, the database is shared
fn unique_contact() -> (String, String) {
    let tag = Uuid::new_v4().simple().to_string();
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(10)
        .collect();
    (format!("{}@acme.test", &tag[..12]), format!("+91{}", digits))
}

fn unique_account(status: VendorStatus) -> VendorAccount {
    let (email, phone) = unique_contact();
    fixtures::account(Role::Vendor, status, &email, &phone)
}

#[test_context(PgHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn insert_and_find_account(ctx: &PgHarness) {
    let store = PostgresAccountStore::new(ctx.db_pool.clone());
    let account = unique_account(VendorStatus::Pending);

    let created = match store.insert(&account).await.unwrap() {
        InsertOutcome::Created(created) => created,
        InsertOutcome::Duplicate(field) => panic!("unexpected duplicate on {}", field),
    };
    assert_eq!(created.id, account.id);
    assert_eq!(created.documents.pan_card, account.documents.pan_card);

    let by_email = store
        .find_by_email(&account.contact_details.email.to_uppercase())
        .await
        .unwrap()
        .expect("found by email");
    assert_eq!(by_email.id, account.id);

    let by_phone = store
        .find_by_phone(&account.contact_details.phone_number)
        .await
        .unwrap()
        .expect("found by phone");
    assert_eq!(by_phone.status, VendorStatus::Pending);
}

#[test_context(PgHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn unique_indexes_report_the_field(ctx: &PgHarness) {
    let store = PostgresAccountStore::new(ctx.db_pool.clone());
    let account = unique_account(VendorStatus::Pending);
    store.insert(&account).await.unwrap();

    let mut same_email = unique_account(VendorStatus::Pending);
    same_email.contact_details.email = account.contact_details.email.clone();
    assert!(matches!(
        store.insert(&same_email).await.unwrap(),
        InsertOutcome::Duplicate("email")
    ));

    let mut same_phone = unique_account(VendorStatus::Pending);
    same_phone.contact_details.phone_number = account.contact_details.phone_number.clone();
    assert!(matches!(
        store.insert(&same_phone).await.unwrap(),
        InsertOutcome::Duplicate("phone_number")
    ));

    let mut same_gst = unique_account(VendorStatus::Pending);
    same_gst.company_info.gst_number = account.company_info.gst_number.clone();
    assert!(matches!(
        store.insert(&same_gst).await.unwrap(),
        InsertOutcome::Duplicate("gst_number")
    ));
}

#[test_context(PgHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn refresh_token_is_replaced(ctx: &PgHarness) {
    let store = PostgresAccountStore::new(ctx.db_pool.clone());
    let account = unique_account(VendorStatus::Approved);
    store.insert(&account).await.unwrap();

    assert!(store.set_refresh_token(account.id, Some("first")).await.unwrap());
    assert!(store.set_refresh_token(account.id, Some("second")).await.unwrap());

    let stored = store.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token.as_deref(), Some("second"));

    let missing = fixtures::account(Role::Vendor, VendorStatus::Approved, "x@y.test", "+1");
    assert!(!store.set_refresh_token(missing.id, Some("t")).await.unwrap());
}

#[test_context(PgHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn list_filters_by_status(ctx: &PgHarness) {
    let store = PostgresAccountStore::new(ctx.db_pool.clone());
    let rejected = unique_account(VendorStatus::Rejected);
    store.insert(&rejected).await.unwrap();

    let listed = store.list(Some(VendorStatus::Rejected)).await.unwrap();
    assert!(listed.iter().any(|a| a.id == rejected.id));
    assert!(listed.iter().all(|a| a.status == VendorStatus::Rejected));

    store.ping().await.unwrap();
}

#[test_context(PgHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn challenge_lifecycle(ctx: &PgHarness) {
    let store = PostgresChallengeStore::new(ctx.db_pool.clone());
    let (email, _) = unique_contact();
    let now = Utc::now();

    let challenge = VerificationChallenge::new(
        email.clone(),
        "123456".to_string(),
        VerificationMethod::Email,
        now,
        Duration::minutes(15),
    );
    store.upsert(&challenge).await.unwrap();

    assert!(store.mark_verified(&email, "000000", now).await.unwrap().is_none());
    let verified = store.mark_verified(&email, "123456", now).await.unwrap().unwrap();
    assert!(verified.verified);
    // Second transition loses
    assert!(store.mark_verified(&email, "123456", now).await.unwrap().is_none());

    // Re-issue resets the verified flag
    let reissued = VerificationChallenge::new(
        email.clone(),
        "654321".to_string(),
        VerificationMethod::Email,
        now,
        Duration::minutes(15),
    );
    let stored = store.upsert(&reissued).await.unwrap();
    assert!(!stored.verified);
    assert_eq!(stored.code, "654321");

    // A stale code does not remove the re-issued challenge
    assert!(!store.delete_if_code(&email, "123456").await.unwrap());
    assert!(store.delete_if_code(&email, "654321").await.unwrap());
    assert!(!store.delete(&email).await.unwrap());
    assert!(store.find(&email).await.unwrap().is_none());
}

#[test_context(PgHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn delete_expired_keeps_live_challenges(ctx: &PgHarness) {
    let store = PostgresChallengeStore::new(ctx.db_pool.clone());
    let (expired_id, _) = unique_contact();
    let (live_id, _) = unique_contact();
    let now = Utc::now();

    let expired = VerificationChallenge::new(
        expired_id.clone(),
        "111111".to_string(),
        VerificationMethod::Email,
        now - Duration::minutes(30),
        Duration::minutes(15),
    );
    let live = VerificationChallenge::new(
        live_id.clone(),
        "222222".to_string(),
        VerificationMethod::Sms,
        now,
        Duration::minutes(15),
    );
    store.upsert(&expired).await.unwrap();
    store.upsert(&live).await.unwrap();

    assert!(store.delete_expired(now).await.unwrap() >= 1);
    assert!(store.find(&expired_id).await.unwrap().is_none());
    assert!(store.find(&live_id).await.unwrap().is_some());
}
