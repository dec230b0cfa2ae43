use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::kernel::MIN_BCRYPT_COST;

pub const MIN_OTP_TTL_MINUTES: i64 = 5;
pub const MAX_OTP_TTL_MINUTES: i64 = 15;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub otp_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub external_call_timeout_secs: u64,
    pub cookie_secure: bool,
    pub allow_admin_self_registration: bool,
    /// Zero disables the reaper
    pub challenge_reap_interval_secs: u64,
    pub brevo_api_key: String,
    pub brevo_sender_email: String,
    pub brevo_sender_name: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", 12)?;
        if bcrypt_cost < MIN_BCRYPT_COST {
            bail!("BCRYPT_COST must be at least {}", MIN_BCRYPT_COST);
        }

        let otp_ttl_minutes: i64 = parse_or(&lookup, "OTP_TTL_MINUTES", MAX_OTP_TTL_MINUTES)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parse_or(&lookup, "PORT", 8080)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "vendor-onboarding".to_string()),
            access_token_ttl_minutes: parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 15)?,
            refresh_token_ttl_days: parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 7)?,
            otp_ttl_minutes: otp_ttl_minutes.clamp(MIN_OTP_TTL_MINUTES, MAX_OTP_TTL_MINUTES),
            bcrypt_cost,
            external_call_timeout_secs: parse_or(&lookup, "EXTERNAL_CALL_TIMEOUT_SECS", 5)?,
            cookie_secure: parse_bool(&lookup, "COOKIE_SECURE")?,
            allow_admin_self_registration: parse_bool(&lookup, "ALLOW_ADMIN_SELF_REGISTRATION")?,
            challenge_reap_interval_secs: parse_or(&lookup, "CHALLENGE_REAP_INTERVAL_SECS", 300)?,
            brevo_api_key: required("BREVO_API_KEY")?,
            brevo_sender_email: required("BREVO_SENDER_EMAIL")?,
            brevo_sender_name: lookup("BREVO_SENDER_NAME")
                .unwrap_or_else(|| "Vendor Registration".to_string()),
            twilio_account_sid: required("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: required("TWILIO_AUTH_TOKEN")?,
            twilio_phone_number: required("TWILIO_PHONE_NUMBER")?,
            allowed_origins: parse_list(lookup("ALLOWED_ORIGINS")),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => bail!("{} must be true or false, got {:?}", key, other),
    }
}

fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
