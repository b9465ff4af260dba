//! Twilio Programmable Messaging dispatcher (SMS)

use crate::domain::types::MessageId;
use crate::infra::config::Config;
use crate::io::error::DispatchError;
use crate::io::traits::Dispatcher;
use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Subset of the Message resource we care about
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Twilio error body, e.g. `{"code": 21211, "message": "Invalid 'To' Phone Number"}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

pub struct TwilioDispatcher {
    messages_url: String,
    auth_header: String,
    from_number: String,
    http: reqwest::Client,
}

impl TwilioDispatcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.twilio_timeout_ms()))
            .build()
            .context("Failed to build Twilio HTTP client")?;

        Ok(Self {
            messages_url: Self::messages_url(config.twilio_api_base(), config.twilio_account_sid()),
            auth_header: Self::basic_auth(config.twilio_account_sid(), config.twilio_auth_token()),
            from_number: config.twilio_from_number().to_string(),
            http,
        })
    }

    fn messages_url(api_base: &str, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            api_base.trim_end_matches('/'),
            account_sid
        )
    }

    fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }

    fn rejection(status: u16, body: &str) -> DispatchError {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        DispatchError::Rejected {
            status,
            code: parsed.code,
            message: parsed.message.unwrap_or_else(|| body.to_string()),
        }
    }
}

#[async_trait]
impl Dispatcher for TwilioDispatcher {
    async fn send(&self, to: &str, body: &str) -> Result<MessageId, DispatchError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(DispatchError::MissingRecipient);
        }

        let start = Instant::now();
        let response = self
            .http
            .post(&self.messages_url)
            .header("Authorization", &self.auth_header)
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(Self::rejection(status.as_u16(), &text));
        }

        let message: MessageResource = serde_json::from_str(&text)?;
        debug!(sid = %message.sid, latency_ms = %latency_ms, "twilio_message_created");
        Ok(MessageId(message.sid))
    }
}
