use anyhow::{anyhow, bail, Context};
use axum::http::HeaderValue;
use secrecy::SecretString;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::gateway::{TwilioCredentials, DEFAULT_TWILIO_API_BASE_URL};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub allowed_origins: CorsOrigins,
    pub twilio: TwilioCredentials,
    /// Sender number every notice goes out from.
    pub sender: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("HEADSUP_API_PORT") {
            Ok(p) => p
                .parse()
                .with_context(|| format!("HEADSUP_API_PORT is not a valid port: {}", p))?,
            Err(_) => DEFAULT_PORT,
        };

        let allowed_origins = std::env::var("HEADSUP_ALLOWED_ORIGINS")
            .map(|v| CorsOrigins::parse(&v))
            .unwrap_or(Ok(CorsOrigins::Any))
            .context("Invalid HEADSUP_ALLOWED_ORIGINS")?;

        let twilio = TwilioCredentials {
            account_sid: required("TWILIO_ACCOUNT_SID")?,
            auth_token: SecretString::new(required("TWILIO_AUTH_TOKEN")?),
            base_url: std::env::var("TWILIO_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TWILIO_API_BASE_URL.to_string()),
        };

        Ok(Self {
            port,
            allowed_origins,
            twilio,
            sender: required("TWILIO_PHONE_NUMBER")?,
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("{} must be set", name)),
    }
}

impl CorsOrigins {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        let entries: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if entries.is_empty() {
            bail!("no origins given");
        }
        if entries.contains(&"*") {
            return Ok(Self::Any);
        }

        entries
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("not a valid origin: {}", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Self::List)
    }

    pub fn layer(&self) -> CorsLayer {
        match self {
            Self::Any => CorsLayer::permissive(),
            // Credentials rule out `*` for methods and headers, so echo the request's.
            Self::List(origins) => CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins.iter().cloned()))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true),
        }
    }
}

impl std::fmt::Display for CorsOrigins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::List(origins) => {
                let names: Vec<&str> = origins.iter().filter_map(|o| o.to_str().ok()).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}
