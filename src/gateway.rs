use async_trait::async_trait;
use log::info;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway configuration error: {0}")]
    Configuration(String),

    #[error("Failed to reach gateway: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Gateway rejected message ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct SmsMessage {
    pub from: String,
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Outbound SMS sender shared by every dispatch request.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> Result<SentMessage, GatewayError>;
}

#[derive(Debug)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: SecretString,
    pub base_url: String,
}

pub struct TwilioGateway {
    credentials: TwilioCredentials,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioGateway {
    pub fn new(credentials: TwilioCredentials) -> Result<Self, GatewayError> {
        if credentials.account_sid.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "account SID is empty".to_string(),
            ));
        }
        if credentials.auth_token.expose_secret().trim().is_empty() {
            return Err(GatewayError::Configuration(
                "auth token is empty".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            client: Client::new(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.credentials.base_url.trim_end_matches('/'),
            self.credentials.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    async fn send(&self, message: &SmsMessage) -> Result<SentMessage, GatewayError> {
        let form = [
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.account_sid,
                Some(self.credentials.auth_token.expose_secret()),
            )
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        let sent: SentMessage = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        info!("Message {} queued for {}", sent.sid, message.to);
        Ok(sent)
    }
}

fn rejection(status: u16, body: &str) -> GatewayError {
    match serde_json::from_str::<TwilioErrorBody>(body) {
        Ok(TwilioErrorBody {
            code,
            message: Some(message),
        }) => GatewayError::Rejected {
            status,
            code,
            message,
        },
        Ok(TwilioErrorBody { code, message: None }) => GatewayError::Rejected {
            status,
            code,
            message: body.to_string(),
        },
        Err(_) => GatewayError::Rejected {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}
