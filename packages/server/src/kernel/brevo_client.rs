// Transactional email through the Brevo HTTP API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::kernel::{BaseEmailService, EmailMessage};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody {
    sender: BrevoEmailAddress,
    to: Vec<BrevoEmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

#[derive(Debug, Clone)]
pub struct BrevoEmailAdapter {
    client: Client,
    api_key: String,
    sender_email: String,
    sender_name: String,
    endpoint: String,
}

impl BrevoEmailAdapter {
    pub fn new(
        api_key: impl Into<String>,
        sender_email: impl Into<String>,
        sender_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Brevo HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            sender_email: sender_email.into(),
            sender_name: sender_name.into(),
            endpoint: BREVO_SEND_URL.to_string(),
        })
    }

    /// Point the adapter at a different endpoint (used against local fakes).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn body_for(&self, message: &EmailMessage) -> BrevoSendEmailBody {
        BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: self.sender_email.clone(),
                name: Some(self.sender_name.clone()),
            },
            to: vec![BrevoEmailAddress {
                email: message.to.clone(),
                name: None,
            }],
            subject: message.subject.clone(),
            html_content: message.html.clone(),
            text_content: message.text.clone(),
        }
    }
}

#[async_trait]
impl BaseEmailService for BrevoEmailAdapter {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&self.body_for(message))
            .send()
            .await
            .context("request to Brevo failed")?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Brevo send failed (status={}): {}", status.as_u16(), body)
    }
}
