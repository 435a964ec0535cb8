//! Svix signature verification for identity provider webhooks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use coursely_application::{SignedHeaders, WebhookVerifier};
use coursely_core::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Default replay window, matching the Svix libraries.
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

/// HMAC-SHA256 verifier for `svix-*` signed deliveries.
pub struct SvixWebhookVerifier {
    key: Option<Vec<u8>>,
    tolerance_seconds: u64,
}

impl SvixWebhookVerifier {
    /// Creates a verifier from a `whsec_<base64>` signing secret.
    pub fn new(secret: &str, tolerance_seconds: u64) -> AppResult<Self> {
        let encoded = secret
            .trim()
            .strip_prefix(SECRET_PREFIX)
            .unwrap_or(secret.trim());
        let key = STANDARD.decode(encoded).map_err(|error| {
            AppError::Validation(format!("webhook signing secret is not valid base64: {error}"))
        })?;
        if key.is_empty() {
            return Err(AppError::Validation(
                "webhook signing secret must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            key: Some(key),
            tolerance_seconds,
        })
    }

    /// Creates a verifier that rejects every delivery.
    ///
    /// Used when no signing secret is configured.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            key: None,
            tolerance_seconds: 0,
        }
    }

    fn verify_at(&self, payload: &[u8], headers: &SignedHeaders, now: i64) -> AppResult<()> {
        let Some(key) = self.key.as_deref() else {
            return Err(AppError::InvalidSignature(
                "webhook signing secret is not configured".to_owned(),
            ));
        };

        let raw_timestamp = headers.timestamp.trim();
        let timestamp = raw_timestamp.parse::<i64>().map_err(|_| {
            AppError::InvalidSignature("svix-timestamp is not a unix timestamp".to_owned())
        })?;
        if now.saturating_sub(timestamp).unsigned_abs() > self.tolerance_seconds {
            return Err(AppError::InvalidSignature(
                "svix-timestamp is outside the tolerance window".to_owned(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|error| AppError::Internal(format!("invalid webhook signing key: {error}")))?;
        mac.update(headers.id.as_bytes());
        mac.update(b".");
        mac.update(raw_timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
            .any(|candidate| mac.clone().verify_slice(&candidate).is_ok());

        if matched {
            Ok(())
        } else {
            Err(AppError::InvalidSignature(
                "no matching v1 signature".to_owned(),
            ))
        }
    }
}

impl WebhookVerifier for SvixWebhookVerifier {
    fn verify(&self, payload: &[u8], headers: &SignedHeaders) -> AppResult<()> {
        self.verify_at(payload, headers, Utc::now().timestamp())
    }
}
