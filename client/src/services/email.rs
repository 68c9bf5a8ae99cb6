//! # Email Transaction Service
//!
//! Triggers the backend's email evaluation job and reads its status.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{EmailEvaluationResult, EmailEvaluationStatus};

use crate::core::error::{ClientError, Result};
use crate::core::service::EmailEvaluationApi;
use crate::services::api::ApiRequest;
use crate::session::SessionManager;

pub struct EmailTransactionService {
    session: Arc<SessionManager>,
}

impl EmailTransactionService {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    async fn trigger(&self, path: String) -> Result<EmailEvaluationResult> {
        let response = self
            .session
            .execute(ApiRequest::post(path))
            .await?
            .error_for_status()?;
        let result = response.json::<EmailEvaluationResult>()?;
        tracing::info!(
            success = result.success,
            added = ?result.added,
            duration_ms = ?result.processing_time_ms,
            "Email evaluation triggered"
        );
        Ok(result)
    }
}

#[async_trait]
impl EmailEvaluationApi for EmailTransactionService {
    #[tracing::instrument(skip(self))]
    async fn evaluate(&self) -> Result<EmailEvaluationResult> {
        self.trigger("/email-transactions/evaluate".to_string()).await
    }

    #[tracing::instrument(skip(self))]
    async fn evaluate_async(&self) -> Result<EmailEvaluationResult> {
        self.trigger("/email-transactions/evaluate-async".to_string()).await
    }

    async fn status(&self) -> Result<EmailEvaluationStatus> {
        let response = self
            .session
            .execute(ApiRequest::get("/email-transactions/status"))
            .await?
            .error_for_status()?;
        response.json()
    }

    #[tracing::instrument(skip(self))]
    async fn evaluate_for_user(&self, user_id: &str) -> Result<EmailEvaluationResult> {
        let user_id = user_id.trim();
        if user_id.is_empty() || user_id.contains(['/', '?', '#']) {
            return Err(ClientError::Validation(format!("Invalid user id: {:?}", user_id)));
        }
        self.trigger(format!("/email-transactions/evaluate/{}", user_id))
            .await
    }
}
