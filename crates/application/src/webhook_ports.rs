//! Webhook signature verification port.

use coursely_core::{AppError, AppResult};

/// Signature headers as received; any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct WebhookHeaders {
    /// `svix-id`: unique message id, reused across redeliveries.
    pub id: Option<String>,
    /// `svix-timestamp`: unix seconds at signing time.
    pub timestamp: Option<String>,
    /// `svix-signature`: space-delimited `v1,<base64>` signatures.
    pub signature: Option<String>,
}

impl WebhookHeaders {
    /// Checks that all three headers are present and non-blank.
    pub fn require(self) -> AppResult<SignedHeaders> {
        let mut missing = Vec::new();
        let id = present(self.id, "svix-id", &mut missing);
        let timestamp = present(self.timestamp, "svix-timestamp", &mut missing);
        let signature = present(self.signature, "svix-signature", &mut missing);

        match (id, timestamp, signature) {
            (Some(id), Some(timestamp), Some(signature)) => Ok(SignedHeaders {
                id,
                timestamp,
                signature,
            }),
            _ => Err(AppError::MissingHeaders(missing.join(", "))),
        }
    }
}

fn present(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = value.filter(|value| !value.trim().is_empty());
    if value.is_none() {
        missing.push(name);
    }
    value
}

/// Complete set of signature headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Message id.
    pub id: String,
    /// Signing timestamp in unix seconds, as sent.
    pub timestamp: String,
    /// Signature list, as sent.
    pub signature: String,
}

/// Verifies that a payload was signed by the identity provider.
pub trait WebhookVerifier: Send + Sync {
    /// Returns `Ok(())` only for an authentic payload inside the replay window.
    ///
    /// Fails with [`AppError::InvalidSignature`] otherwise.
    fn verify(&self, payload: &[u8], headers: &SignedHeaders) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use coursely_core::AppError;

    use super::WebhookHeaders;

    #[test]
    fn complete_headers_are_accepted() {
        let headers = WebhookHeaders {
            id: Some("msg_1".to_owned()),
            timestamp: Some("1700000000".to_owned()),
            signature: Some("v1,abc".to_owned()),
        };
        assert!(headers.require().is_ok());
    }

    #[test]
    fn missing_signature_is_reported_by_name() {
        let headers = WebhookHeaders {
            id: Some("msg_1".to_owned()),
            timestamp: Some("1700000000".to_owned()),
            signature: None,
        };

        match headers.require() {
            Err(AppError::MissingHeaders(names)) => assert_eq!(names, "svix-signature"),
            other => panic!("expected missing headers, got {other:?}"),
        }
    }

    #[test]
    fn blank_headers_count_as_missing() {
        let headers = WebhookHeaders {
            id: Some(" ".to_owned()),
            timestamp: None,
            signature: Some("v1,abc".to_owned()),
        };

        match headers.require() {
            Err(AppError::MissingHeaders(names)) => {
                assert_eq!(names, "svix-id, svix-timestamp");
            }
            other => panic!("expected missing headers, got {other:?}"),
        }
    }
}
