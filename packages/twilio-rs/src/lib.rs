// Minimal client for the Twilio Programmable Messaging API.

use std::collections::HashMap;
use std::time::Duration;

pub mod models;
use reqwest::{header, Client};
use thiserror::Error;

use crate::models::{ErrorResponse, MessageResponse};

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format
    pub from_number: String,
}

#[derive(Debug, Error)]
pub enum TwilioError {
    /// The request never produced a response (connect, TLS, timeout)
    #[error("request to Twilio failed: {0}")]
    Transport(String),
    /// Twilio answered with a non-success status
    #[error("Twilio returned an error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body could not be decoded
    #[error("failed to parse Twilio response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
    api_base: String,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Use a client with a request timeout applied to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, TwilioError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TwilioError::Transport(e.to_string()))?;
        Ok(self)
    }

    /// Point the client at a different API host (used against local fakes).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub async fn send_sms(&self, to: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let url = format!(
            "{base}/2010-04-01/Accounts/{sid}/Messages.json",
            base = self.api_base,
            sid = self.options.account_sid
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", to);
        form_body.insert("From", &self.options.from_number);
        form_body.insert("Body", body);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .headers(headers)
            .form(&form_body)
            .send()
            .await
            .map_err(|e| TwilioError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| TwilioError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TwilioError::Api {
            status: 400,
            message: "The 'To' number is not a valid phone number.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Twilio returned an error (400): The 'To' number is not a valid phone number."
        );
    }

    #[test]
    fn test_with_timeout_keeps_options() {
        let service = TwilioService::new(TwilioOptions {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15555550100".to_string(),
        })
        .with_timeout(Duration::from_secs(5))
        .unwrap();
        assert_eq!(service.options.account_sid, "AC123");
        assert_eq!(service.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_message_response_parses() {
        let json = r#"{"sid":"SM123","status":"queued","to":"+15555550100","error_code":null}"#;
        let parsed: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sid, "SM123");
        assert_eq!(parsed.status, "queued");
        assert!(parsed.error_message.is_none());
    }
}
