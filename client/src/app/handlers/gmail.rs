//! # Gmail Handlers
//!
//! Mailbox connection, import from Gmail and the server-side email
//! evaluation job. A sync or evaluation that succeeds reloads the imported
//! rows; a sync that imported anything also reloads the transaction list.

use shared::{
    EmailEvaluationResult, EmailEvaluationStatus, EmailTransaction, GmailSyncResponse,
    MessageResponse,
};

use crate::app::{App, AppEvent, EvaluationMode, Form, RequestHandle};
use crate::core::error::Result;

impl App {
    /// Fetch the consent page that links a Gmail mailbox.
    pub fn gmail_connect(&mut self) -> RequestHandle {
        self.begin_form(Form::Gmail);

        let gmail = self.services.gmail.clone();
        self.spawn_request(None, async move {
            AppEvent::GmailConnectUrl(gmail.connect_url().await)
        })
    }

    /// Import transactions from Gmail; `current_month` limits the sync to
    /// this month's mail.
    pub fn gmail_sync(&mut self, current_month: bool) -> RequestHandle {
        self.begin_form(Form::Gmail);
        self.state.write().gmail.syncing = true;

        let gmail = self.services.gmail.clone();
        self.spawn_request(None, async move {
            let result = if current_month {
                gmail.sync_current_month().await
            } else {
                gmail.sync().await
            };
            AppEvent::GmailSynced(result)
        })
    }

    /// Load the rows extracted from mail. Owned by the current view.
    pub fn load_email_transactions(&mut self) -> RequestHandle {
        let owner = self.state.read().view;
        let gmail = self.services.gmail.clone();
        self.spawn_request(Some(owner), async move {
            AppEvent::EmailTransactionsLoaded(gmail.transactions().await)
        })
    }

    pub fn gmail_disconnect(&mut self) -> RequestHandle {
        self.begin_form(Form::Gmail);

        let gmail = self.services.gmail.clone();
        self.spawn_request(None, async move {
            AppEvent::GmailDisconnected(gmail.disconnect().await)
        })
    }

    pub fn evaluate_emails(&mut self, mode: EvaluationMode) -> RequestHandle {
        self.begin_form(Form::Gmail);
        self.state.write().gmail.evaluating = true;

        let email = self.services.email.clone();
        self.spawn_request(None, async move {
            let result = match mode {
                EvaluationMode::Now => email.evaluate().await,
                EvaluationMode::Background => email.evaluate_async().await,
                EvaluationMode::ForUser(user_id) => email.evaluate_for_user(&user_id).await,
            };
            AppEvent::EmailsEvaluated(result)
        })
    }

    /// When the evaluation job last ran. Owned by the current view.
    pub fn email_evaluation_status(&mut self) -> RequestHandle {
        let owner = self.state.read().view;
        let email = self.services.email.clone();
        self.spawn_request(Some(owner), async move {
            AppEvent::EvaluationStatusLoaded(email.status().await)
        })
    }

    pub(in crate::app) fn on_gmail_connect_url(&mut self, result: Result<String>) {
        self.end_form();
        let mut state = self.state.write();
        match result {
            Ok(url) => {
                state.gmail.connect_url = Some(url);
                state.clear_error(Form::Gmail);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not start Gmail connect");
                state.set_error(Form::Gmail, e.to_string());
            }
        }
    }

    pub(in crate::app) fn on_gmail_synced(&mut self, result: Result<GmailSyncResponse>) {
        self.end_form();
        let (reload, refetch) = {
            let mut state = self.state.write();
            state.gmail.syncing = false;
            match result {
                Ok(sync) => {
                    tracing::info!(synced = sync.synced, duplicates = sync.duplicates, "Gmail sync finished");
                    let imported = sync.synced > 0;
                    state.gmail.last_sync = Some(sync);
                    state.clear_error(Form::Gmail);
                    let signed_in = state.is_authenticated();
                    (signed_in, imported && signed_in)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Gmail sync failed");
                    state.gmail.last_sync = None;
                    state.set_error(Form::Gmail, e.to_string());
                    (false, false)
                }
            }
        };
        if reload {
            self.load_email_transactions();
        }
        if refetch {
            self.fetch_transactions(None);
        }
    }

    pub(in crate::app) fn on_email_transactions_loaded(
        &mut self,
        result: Result<Vec<EmailTransaction>>,
    ) {
        let mut state = self.state.write();
        if !state.is_authenticated() {
            return;
        }
        match result {
            Ok(rows) => {
                tracing::debug!(count = rows.len(), "Email transactions loaded");
                state.gmail.email_transactions = rows;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Loading email transactions failed");
                state.set_error(Form::Gmail, e.to_string());
            }
        }
    }

    pub(in crate::app) fn on_gmail_disconnected(&mut self, result: Result<MessageResponse>) {
        self.end_form();
        let mut state = self.state.write();
        match result {
            Ok(ack) => {
                tracing::info!(message = %ack.message, "Gmail disconnected");
                state.gmail = Default::default();
                state.clear_error(Form::Gmail);
            }
            Err(e) => state.set_error(Form::Gmail, e.to_string()),
        }
    }

    pub(in crate::app) fn on_emails_evaluated(&mut self, result: Result<EmailEvaluationResult>) {
        self.end_form();
        let reload = {
            let mut state = self.state.write();
            state.gmail.evaluating = false;
            match result {
                Ok(evaluation) if evaluation.success => {
                    state.clear_error(Form::Gmail);
                    state.gmail.last_evaluation = Some(evaluation);
                    state.is_authenticated()
                }
                Ok(evaluation) => {
                    let message = evaluation
                        .error
                        .clone()
                        .or_else(|| evaluation.message.clone())
                        .unwrap_or_else(|| "Email evaluation failed".to_string());
                    state.set_error(Form::Gmail, message);
                    state.gmail.last_evaluation = Some(evaluation);
                    false
                }
                Err(e) => {
                    state.gmail.last_evaluation = None;
                    state.set_error(Form::Gmail, e.to_string());
                    false
                }
            }
        };
        if reload {
            self.load_email_transactions();
        }
    }

    pub(in crate::app) fn on_evaluation_status(&mut self, result: Result<EmailEvaluationStatus>) {
        let mut state = self.state.write();
        match result {
            Ok(status) => state.gmail.evaluation_status = Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "Loading evaluation status failed");
                state.set_error(Form::Gmail, e.to_string());
            }
        }
    }
}
