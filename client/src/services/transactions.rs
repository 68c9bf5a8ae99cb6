//! # Transaction Service
//!
//! CRUD over `/transactions`. Mutations carry the CSRF token; list responses
//! are normalized into a [`TransactionPage`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    MessageResponse, NewTransaction, Transaction, TransactionEnvelope, TransactionListEnvelope, TransactionPage,
    TransactionQuery, TransactionUpdate,
};

use crate::core::error::{ClientError, Result};
use crate::core::service::TransactionApi;
use crate::services::api::{ApiRequest, ApiResponse};
use crate::session::SessionManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Prefix for server-supplied messages
    fn label(self) -> &'static str {
        match self {
            Operation::Create => "Transaction",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }

    fn failure(self) -> &'static str {
        match self {
            Operation::Create => "Failed to create transaction",
            Operation::Update => "Failed to update transaction",
            Operation::Delete => "Failed to delete transaction",
        }
    }
}

fn operation_error(op: Operation, response: &ApiResponse) -> ClientError {
    match response.status {
        StatusCode::FORBIDDEN => ClientError::Authentication(
            "Authentication error: CSRF validation failed".to_string(),
        ),
        StatusCode::UNAUTHORIZED => ClientError::Authentication(
            "Authentication error: Please log in again".to_string(),
        ),
        StatusCode::NOT_FOUND if op != Operation::Create => {
            ClientError::NotFound("Transaction not found".to_string())
        }
        status => {
            let message = match response.error_message() {
                Some(message) => format!("{} error: {}", op.label(), message),
                None => op.failure().to_string(),
            };
            ClientError::from_status(status, Some(message))
        }
    }
}

/// Ids are interpolated into the path; anything that would change the route is refused.
fn checked_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(ClientError::Validation(format!("Invalid transaction id: {:?}", id)));
    }
    Ok(id)
}

pub struct TransactionService {
    session: Arc<SessionManager>,
}

impl TransactionService {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl TransactionApi for TransactionService {
    #[tracing::instrument(skip(self, query), fields(filters = query.to_query_pairs().len()))]
    async fn list(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        let request = ApiRequest::get("/transactions").query_pairs(query.to_query_pairs());
        let response = self.session.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "Fetching transactions failed");
            return Err(ClientError::from_status(
                response.status,
                Some(
                    response
                        .error_message()
                        .unwrap_or_else(|| "Failed to fetch transactions".to_string()),
                ),
            ));
        }

        let page: TransactionPage = response.json::<TransactionListEnvelope>()?.into();
        tracing::debug!(count = page.transactions.len(), total = ?page.total_count, "Transactions fetched");
        Ok(page)
    }

    #[tracing::instrument(skip(self, transaction), fields(kind = transaction.kind.as_str(), amount = transaction.amount))]
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction> {
        let request = ApiRequest::post("/transactions/create")
            .json(&transaction)?
            .with_csrf();
        let response = self.session.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "Create rejected");
            return Err(operation_error(Operation::Create, &response));
        }

        let mut created = response.json::<TransactionEnvelope>()?.into_inner();
        // Older backends answer without the generated fields
        if created.id.is_empty() {
            created.id = format!("temp-{}", lib_utils::now_millis());
        }
        if created.date.is_empty() {
            created.date = lib_utils::format_time(lib_utils::now_utc());
        }
        tracing::info!(id = %created.id, "Transaction created");
        Ok(created)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update(&self, id: &str, update: TransactionUpdate) -> Result<Option<Transaction>> {
        let id = checked_id(id)?;
        let request = ApiRequest::put(format!("/transactions/{}", id))
            .json(&update)?
            .with_csrf();
        let response = self.session.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "Update rejected");
            return Err(operation_error(Operation::Update, &response));
        }

        match response.json::<TransactionEnvelope>() {
            Ok(envelope) => {
                tracing::info!("Transaction updated");
                Ok(Some(envelope.into_inner()))
            }
            // Acknowledged with a bare message instead of the row
            Err(_) if response.body.is_empty() || response.json::<MessageResponse>().is_ok() => {
                tracing::info!("Transaction update acknowledged without a body");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let id = checked_id(id)?;
        let request = ApiRequest::delete(format!("/transactions/{}", id)).with_csrf();
        let response = self.session.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "Delete rejected");
            return Err(operation_error(Operation::Delete, &response));
        }
        tracing::info!("Transaction deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CSRF_PATH;
    use crate::testing::{MockReply, MockTransport};
    use serde_json::json;
    use shared::TransactionType;

    fn service(transport: &Arc<MockTransport>) -> TransactionService {
        TransactionService::new(Arc::new(SessionManager::new(transport.clone())))
    }

    fn coffee() -> NewTransaction {
        NewTransaction {
            description: "Coffee".to_string(),
            amount: 4.5,
            currency: None,
            category: "Food & Drink".to_string(),
            kind: TransactionType::Debit,
            notes: None,
            transaction_method: None,
        }
    }

    fn with_csrf(
        handler: impl Fn(&ApiRequest) -> MockReply + Send + Sync + 'static,
    ) -> Arc<MockTransport> {
        Arc::new(MockTransport::new(move |request, _| {
            if request.path == CSRF_PATH {
                MockReply::json(200, json!({"token": "tok"}))
            } else {
                handler(request)
            }
        }))
    }

    #[tokio::test]
    async fn test_create_sends_csrf_and_returns_server_fields() {
        let transport = with_csrf(|_| {
            MockReply::json(201, json!({"transaction": {
                "id": 42,
                "description": "Coffee",
                "amount": 4.5,
                "category": "Food & Drink",
                "type": "debit",
                "date": "2026-10-01T08:00:00Z"
            }}))
        });

        let created = service(&transport).create(coffee()).await.unwrap();

        assert_eq!(created.id, "42");
        assert_eq!(created.date, "2026-10-01T08:00:00Z");
        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.path, "/transactions/create");
        assert_eq!(sent.header_value("X-XSRF-TOKEN"), Some("tok"));
        assert_eq!(sent.body.unwrap()["type"], "debit");
    }

    #[tokio::test]
    async fn test_create_fills_missing_id_and_date() {
        let transport = with_csrf(|_| {
            MockReply::json(200, json!({
                "description": "Coffee",
                "amount": 4.5,
                "category": "Food & Drink",
                "type": "debit"
            }))
        });

        let created = service(&transport).create(coffee()).await.unwrap();

        assert!(created.id.starts_with("temp-"));
        assert!(lib_utils::parse_utc(&created.date).is_ok());
    }

    #[tokio::test]
    async fn test_list_accepts_documented_envelopes() {
        let bodies = [
            json!([{"id": "1", "amount": 1.0, "type": "credit"}]),
            json!({"transactions": [{"id": "1", "amount": 1.0, "type": "credit"}]}),
            json!({"data": [{"id": "1", "amount": 1.0, "type": "credit"}], "totalCount": 9}),
        ];
        for body in bodies {
            let transport = Arc::new(MockTransport::new(move |_, _| MockReply::json(200, body.clone())));
            let page = service(&transport).list(&TransactionQuery::default()).await.unwrap();
            assert_eq!(page.transactions.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_shape() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            MockReply::json(200, json!({"items": [], "other": []}))
        }));
        let err = service(&transport)
            .list(&TransactionQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_list_sends_filters() {
        let transport = Arc::new(MockTransport::new(|_, _| MockReply::json(200, json!([]))));
        let query = TransactionQuery {
            kind: Some(TransactionType::Credit),
            min_amount: Some(10.0),
            ..Default::default()
        };

        service(&transport).list(&query).await.unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(
            sent.query,
            vec![
                ("type".to_string(), "credit".to_string()),
                ("minAmount".to_string(), "10".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_mutation_error_messages() {
        let not_found = with_csrf(|_| MockReply::status(404));
        let err = service(&not_found).delete("7").await.unwrap_err();
        assert_eq!(err, ClientError::NotFound("Transaction not found".to_string()));

        let invalid = with_csrf(|_| MockReply::json(422, json!({"message": "amount must be positive"})));
        let err = service(&invalid)
            .update("7", TransactionUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Update error: amount must be positive");

        let broken = with_csrf(|_| MockReply::status(500));
        let err = service(&broken).create(coffee()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create transaction");
    }

    #[tokio::test]
    async fn test_update_returns_row_or_acknowledgement() {
        let echoed = with_csrf(|_| {
            MockReply::json(200, json!({"transaction": {
                "id": "7", "description": "Rent", "amount": 950.0, "type": "debit", "date": "2026-10-01"
            }}))
        });
        let updated = service(&echoed)
            .update("7", TransactionUpdate::default())
            .await
            .unwrap();
        assert_eq!(updated.map(|tx| tx.amount), Some(950.0));

        let acknowledged = with_csrf(|_| MockReply::json(200, json!({"message": "Updated"})));
        let updated = service(&acknowledged)
            .update("7", TransactionUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());

        let garbage = with_csrf(|_| MockReply::json(200, json!({"rows": 1})));
        let err = service(&garbage)
            .update("7", TransactionUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_csrf_rejected_twice_is_reported() {
        let transport = with_csrf(|_| MockReply::json(403, json!({"code": "CSRF_TOKEN_INVALID"})));
        let err = service(&transport).delete("7").await.unwrap_err();

        assert_eq!(err.to_string(), "Authentication error: CSRF validation failed");
        assert_eq!(transport.count("DELETE", "/transactions/7"), 2);
    }

    #[tokio::test]
    async fn test_ids_that_change_the_route_are_refused() {
        let transport = Arc::new(MockTransport::new(|_, _| MockReply::status(204)));
        let transactions = service(&transport);

        assert!(transactions.delete("../users").await.is_err());
        assert!(transactions.delete("1?force=true").await.is_err());
        assert!(transactions.delete("  ").await.is_err());
        assert!(transport.requests().is_empty());
    }
}
