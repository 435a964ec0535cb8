use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use coursely_core::AppError;
use coursely_infrastructure::DEFAULT_TOLERANCE_SECONDS;
use tracing_subscriber::EnvFilter;

const MIN_INTERNAL_TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub clerk_webhook_secret: Option<String>,
    pub webhook_tolerance_seconds: u64,
    pub internal_api_token: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let internal_api_token = required_env("INTERNAL_API_TOKEN")?;
        if internal_api_token.trim().len() < MIN_INTERNAL_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "INTERNAL_API_TOKEN must be at least {MIN_INTERNAL_TOKEN_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let clerk_webhook_secret = env::var("CLERK_WEBHOOK_SECRET")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let webhook_tolerance_seconds = match env::var("WEBHOOK_TOLERANCE_SECONDS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid WEBHOOK_TOLERANCE_SECONDS: {error}"))
            })?,
            Err(_) => DEFAULT_TOLERANCE_SECONDS,
        };

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            clerk_webhook_secret,
            webhook_tolerance_seconds,
            internal_api_token: internal_api_token.trim().to_owned(),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
