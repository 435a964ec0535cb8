use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use coursely_application::{ClientSyncPayload, ClientSyncReceipt, SyncApiClient};
use coursely_core::{AppError, AppResult};

const SYNC_PATH: &str = "/api/users/sync";

/// HTTP implementation of the sync API port.
pub struct HttpSyncApiClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct SyncErrorBody {
    error: String,
}

impl HttpSyncApiClient {
    /// Creates a client posting to `<base_url>/api/users/sync`.
    pub fn new(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(SYNC_PATH))
            .map_err(|error| {
                AppError::Validation(format!("invalid sync api base url '{base_url}': {error}"))
            })?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Returns the resolved endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SyncApiClient for HttpSyncApiClient {
    async fn sync_profile(&self, payload: &ClientSyncPayload) -> AppResult<ClientSyncReceipt> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("sync api transport error: {error}")))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<ClientSyncReceipt>().await.map_err(|error| {
                AppError::Internal(format!("sync api returned an unreadable body: {error}"))
            });
        }

        let detail = response
            .json::<SyncErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());

        if status.is_client_error() {
            Err(AppError::Validation(format!(
                "sync api rejected the request with status {status}: {detail}"
            )))
        } else {
            Err(AppError::Internal(format!(
                "sync api failed with status {status}: {detail}"
            )))
        }
    }
}
