//! # Gmail Service
//!
//! Connects a Gmail mailbox and imports the transactions the backend finds
//! in bank and merchant emails.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{AuthUrlResponse, EmailTransaction, GmailSyncResponse, MessageResponse};

use crate::core::error::Result;
use crate::core::service::GmailApi;
use crate::services::api::ApiRequest;
use crate::session::SessionManager;

pub struct GmailService {
    session: Arc<SessionManager>,
}

impl GmailService {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl GmailApi for GmailService {
    /// URL that starts the Gmail OAuth consent flow.
    #[tracing::instrument(skip(self))]
    async fn connect_url(&self) -> Result<String> {
        let response = self
            .session
            .execute(ApiRequest::get("/gmail/connect"))
            .await?
            .error_for_status()?;
        Ok(response.json::<AuthUrlResponse>()?.auth_url)
    }

    #[tracing::instrument(skip(self))]
    async fn sync(&self) -> Result<GmailSyncResponse> {
        let response = self
            .session
            .execute(ApiRequest::post("/gmail/sync"))
            .await?
            .error_for_status()?;
        let result = response.json::<GmailSyncResponse>()?;
        tracing::info!(
            synced = result.synced,
            processed = result.processed,
            duplicates = result.duplicates,
            "Gmail sync finished"
        );
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    async fn sync_current_month(&self) -> Result<GmailSyncResponse> {
        let response = self
            .session
            .execute(ApiRequest::post("/gmail/sync-current-month"))
            .await?
            .error_for_status()?;
        let result = response.json::<GmailSyncResponse>()?;
        tracing::info!(synced = result.synced, "Gmail current-month sync finished");
        Ok(result)
    }

    async fn transactions(&self) -> Result<Vec<EmailTransaction>> {
        let response = self
            .session
            .execute(ApiRequest::get("/gmail/transactions"))
            .await?
            .error_for_status()?;
        response.json()
    }

    #[tracing::instrument(skip(self))]
    async fn disconnect(&self) -> Result<MessageResponse> {
        let response = self
            .session
            .execute(ApiRequest::delete("/gmail/disconnect"))
            .await?
            .error_for_status()?;
        let ack = response.json::<MessageResponse>()?;
        tracing::info!("Gmail disconnected");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ClientError;
    use crate::testing::{MockReply, MockTransport};
    use serde_json::json;

    fn service(transport: &Arc<MockTransport>) -> GmailService {
        GmailService::new(Arc::new(SessionManager::new(transport.clone())))
    }

    #[tokio::test]
    async fn test_sync_counts() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            MockReply::json(
                200,
                json!({"synced": 4, "processed": 10, "skipped": 5, "duplicates": 1, "message": "ok"}),
            )
        }));

        let result = service(&transport).sync_current_month().await.unwrap();

        assert_eq!(result.synced, 4);
        assert_eq!(result.duplicates, 1);
        assert_eq!(transport.count("POST", "/gmail/sync-current-month"), 1);
    }

    #[tokio::test]
    async fn test_connect_url_and_disconnect() {
        let transport = Arc::new(MockTransport::new(|request, _| match request.path.as_str() {
            "/gmail/connect" => MockReply::json(200, json!({"authUrl": "https://accounts.example/auth"})),
            "/gmail/disconnect" => MockReply::json(200, json!({"message": "Disconnected"})),
            _ => MockReply::status(404),
        }));
        let gmail = service(&transport);

        assert_eq!(gmail.connect_url().await.unwrap(), "https://accounts.example/auth");
        assert_eq!(gmail.disconnect().await.unwrap().message, "Disconnected");
    }

    #[tokio::test]
    async fn test_not_connected_surfaces_server_message() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            MockReply::json(400, json!({"error": "Gmail is not connected"}))
        }));

        let err = service(&transport).transactions().await.unwrap_err();

        assert_eq!(err, ClientError::Validation("Gmail is not connected".to_string()));
    }
}
