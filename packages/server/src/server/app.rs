//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use twilio::{TwilioOptions, TwilioService};

use crate::common::Role;
use crate::config::Config;
use crate::domains::auth::{JwtService, RoutePolicy};
use crate::kernel::{
    AuthSettings, BcryptHasher, BrevoEmailAdapter, PostgresAccountStore, PostgresChallengeStore,
    RandomOtpGenerator, ServerDeps, SystemClock, TwilioSmsAdapter,
};
use crate::server::middleware::{jwt_auth_middleware, require_policy};
use crate::server::routes::{
    admin_login_handler, complete_registration_handler, get_vendor_handler, health_handler,
    list_vendors_handler, refresh_handler, start_registration_handler, vendor_login_handler,
    verify_otp_handler,
};

/// Upper bound for a complete-registration body (four documents)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub cookie_secure: bool,
}

/// Router knobs that differ between production and tests
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Empty means any origin (without credentials)
    pub allowed_origins: Vec<String>,
    /// Per-IP limit on login and registration routes
    pub rate_limit: bool,
}

/// Wire the production adapters from configuration.
pub fn build_server_deps(config: &Config, pool: PgPool) -> Result<ServerDeps> {
    let settings = AuthSettings::from_config(config);

    let twilio = Arc::new(
        TwilioService::new(TwilioOptions {
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_phone_number.clone(),
        })
        .with_timeout(settings.external_call_timeout)?,
    );

    let email = BrevoEmailAdapter::new(
        config.brevo_api_key.clone(),
        config.brevo_sender_email.clone(),
        config.brevo_sender_name.clone(),
        settings.external_call_timeout,
    )?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    Ok(ServerDeps::new(
        Arc::new(PostgresChallengeStore::new(pool.clone())),
        Arc::new(PostgresAccountStore::new(pool)),
        Arc::new(email),
        Arc::new(TwilioSmsAdapter::new(twilio)),
        Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        Arc::new(RandomOtpGenerator),
        Arc::new(SystemClock),
        jwt_service,
        settings,
    ))
}

/// Build the Axum application router
///
/// Returns (Router, Arc<ServerDeps>) - deps are needed for the challenge reaper.
pub fn build_app(config: &Config, pool: PgPool) -> Result<(Router, Arc<ServerDeps>)> {
    let deps = Arc::new(build_server_deps(config, pool)?);
    let state = AppState {
        deps: deps.clone(),
        cookie_secure: config.cookie_secure,
    };
    let options = RouterOptions {
        allowed_origins: config.allowed_origins.clone(),
        rate_limit: true,
    };
    Ok((build_router(state, options)?, deps))
}

pub fn build_router(state: AppState, options: RouterOptions) -> Result<Router> {
    // Login and OTP issuing: burst of 5, one more every 12s per IP
    let mut limited = Router::new()
        .route("/api/admin/auth/login", post(admin_login_handler))
        .route("/api/vendor/auth/login", post(vendor_login_handler))
        .route("/vendors/start-registration", post(start_registration_handler))
        .route("/vendors/verify-otp", post(verify_otp_handler));

    if options.rate_limit {
        let rate_limit_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor) // X-Forwarded-For, then peer address
                .per_second(12)
                .burst_size(5)
                .use_headers()
                .finish()
                .context("Rate limiter configuration is invalid")?,
        );
        limited = limited.layer(GovernorLayer {
            config: rate_limit_config,
        });
    }

    let open = Router::new()
        .route("/api/auth/refresh", post(refresh_handler))
        .route(
            "/vendors/complete-registration",
            post(complete_registration_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/health", get(health_handler));

    let vendor_or_admin = RoutePolicy::roles(&[Role::SuperAdmin, Role::Vendor]);
    let members = Router::new()
        .route("/vendors/:id", get(get_vendor_handler))
        .route_layer(middleware::from_fn(move |req, next| {
            require_policy(vendor_or_admin.clone(), req, next)
        }));

    let admin_only = RoutePolicy::roles(&[Role::SuperAdmin]);
    let admins = Router::new()
        .route("/vendors", get(list_vendors_handler))
        .route_layer(middleware::from_fn(move |req, next| {
            require_policy(admin_only.clone(), req, next)
        }));

    let jwt_service = state.deps.jwt_service.clone();

    let app = Router::new()
        .merge(limited)
        .merge(open)
        .merge(members)
        .merge(admins)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    if origins.is_empty() {
        // Credentials cannot be combined with a wildcard origin
        return cors.allow_origin(Any);
    }
    cors.allow_origin(origins).allow_credentials(true)
}
