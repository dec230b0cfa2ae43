//! Test harnesses.
//!
//! `MockHarness` wires every kernel trait to an in-memory mock and is what most
//! tests use. `PgHarness` runs against a shared Postgres container and backs
//! the `#[ignore]`d store tests (needs Docker).

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use vendor_core::common::{Role, VendorStatus};
use vendor_core::domains::vendor::models::{VendorAccount, VendorProfile};
use vendor_core::domains::registration::activities::{
    complete_registration, start_registration, verify_otp,
};
use vendor_core::kernel::{AuthSettings, ServerDeps, TestDependencies};
use vendor_core::server::{build_router, AppState, RouterOptions};

use super::fixtures;

// =============================================================================
// MockHarness
// =============================================================================

pub struct MockHarness {
    pub mocks: TestDependencies,
    pub deps: ServerDeps,
}

impl AsyncTestContext for MockHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {}
}

impl MockHarness {
    pub fn new() -> Self {
        Self::with_mocks(TestDependencies::new())
    }

    pub fn with_settings(settings: AuthSettings) -> Self {
        Self::with_mocks(TestDependencies::new().with_settings(settings))
    }

    pub fn with_mocks(mocks: TestDependencies) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = mocks.server_deps();
        Self { mocks, deps }
    }

    /// Router without rate limiting
    pub fn router(&self) -> Router {
        self.router_with(RouterOptions::default())
    }

    pub fn router_with(&self, options: RouterOptions) -> Router {
        let state = AppState {
            deps: Arc::new(self.deps.clone()),
            cookie_secure: false,
        };
        build_router(state, options).expect("router builds")
    }

    /// Seed an account directly into the account store
    pub fn seed_account(&self, role: Role, status: VendorStatus, email: &str, phone: &str) -> VendorAccount {
        let account = fixtures::account(role, status, email, phone);
        self.mocks.accounts.clone().with_account(account.clone());
        account
    }

    /// Run start -> verify -> complete with the fixed code
    pub async fn register(&self, email: &str, phone: &str, gst_number: &str) -> VendorProfile {
        start_registration(Some(email), None, &self.deps)
            .await
            .expect("start registration");
        verify_otp(Some(email), None, "123456", &self.deps)
            .await
            .expect("verify otp");
        complete_registration(fixtures::submission(email, phone, gst_number), &self.deps)
            .await
            .expect("complete registration")
    }
}

// =============================================================================
// PgHarness (testcontainers)
// =============================================================================

/// Shared test infrastructure that persists across all tests.
/// The container is started once and reused, migrations run once.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

pub struct PgHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for PgHarness {
    async fn setup() -> Self {
        let infra = SharedTestInfra::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .expect("Failed to connect to test database");
        Self { db_pool }
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}
