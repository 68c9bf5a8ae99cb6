//! # Transaction Handlers

use shared::{NewTransaction, Transaction, TransactionPage, TransactionQuery, TransactionUpdate};

use crate::app::{App, AppEvent, Form, RequestHandle};
use crate::core::error::Result;
use crate::store::FilterUpdate;

impl App {
    /// Load the list. `None` uses the filter in the store.
    ///
    /// The request belongs to the current view, and a newer fetch cancels
    /// an older one still in flight.
    pub fn fetch_transactions(&mut self, query: Option<TransactionQuery>) -> RequestHandle {
        if let Some(previous) = self.list_request.take() {
            previous.cancel();
        }

        let (query, owner) = {
            let mut state = self.state.write();
            state.transactions.fetch_pending();
            let query = query.unwrap_or_else(|| state.transactions.filter.to_query());
            (query, state.view)
        };

        let transactions = self.services.transactions.clone();
        let handle = self.spawn_request(Some(owner), async move {
            AppEvent::TransactionsLoaded(transactions.list(&query).await)
        });
        self.list_request = Some(handle.clone());
        handle
    }

    /// Merge a filter change and reload.
    pub fn set_filter(&mut self, update: FilterUpdate) -> RequestHandle {
        self.state.write().transactions.set_filter(update);
        self.fetch_transactions(None)
    }

    pub fn clear_filters(&mut self) -> RequestHandle {
        self.state.write().transactions.clear_filters();
        self.fetch_transactions(None)
    }

    pub fn create_transaction(&mut self, transaction: NewTransaction) -> RequestHandle {
        self.begin_form(Form::Transaction);
        let transactions = self.services.transactions.clone();
        self.spawn_request(None, async move {
            AppEvent::TransactionCreated(transactions.create(transaction).await)
        })
    }

    pub fn update_transaction(
        &mut self,
        id: impl Into<String>,
        update: TransactionUpdate,
    ) -> RequestHandle {
        let id = id.into();
        self.begin_form(Form::Transaction);
        let transactions = self.services.transactions.clone();
        self.spawn_request(None, async move {
            let result = transactions.update(&id, update.clone()).await;
            AppEvent::TransactionUpdated { id, update, result }
        })
    }

    pub fn delete_transaction(&mut self, id: impl Into<String>) -> RequestHandle {
        let id = id.into();
        self.begin_form(Form::Transaction);
        let transactions = self.services.transactions.clone();
        self.spawn_request(None, async move {
            let result = transactions.delete(&id).await;
            AppEvent::TransactionDeleted { id, result }
        })
    }

    pub(in crate::app) fn on_transactions_loaded(&mut self, result: Result<TransactionPage>) {
        let mut state = self.state.write();
        // The user signed out while the list was loading
        if !state.is_authenticated() {
            state.transactions.fetch_cancelled();
            return;
        }
        match result {
            Ok(page) => {
                tracing::debug!(count = page.transactions.len(), "Transactions loaded");
                state.transactions.fetch_fulfilled(page.transactions);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Loading transactions failed");
                state.transactions.fetch_rejected(e.to_string());
            }
        }
    }

    pub(in crate::app) fn on_transaction_created(&mut self, result: Result<Transaction>) {
        self.end_form();
        let mut state = self.state.write();
        match result {
            Ok(transaction) => {
                state.transactions.prepend(transaction);
                state.clear_error(Form::Transaction);
            }
            Err(e) => state.set_error(Form::Transaction, e.to_string()),
        }
    }

    pub(in crate::app) fn on_transaction_updated(
        &mut self,
        id: String,
        update: TransactionUpdate,
        result: Result<Option<Transaction>>,
    ) {
        self.end_form();
        let mut state = self.state.write();
        match result {
            Ok(echoed) => {
                let found = match echoed {
                    Some(transaction) => state.transactions.replace(transaction),
                    None => state.transactions.apply_update(&id, &update),
                };
                if !found {
                    tracing::debug!(id = %id, "Updated transaction is not in the loaded list");
                }
                state.clear_error(Form::Transaction);
            }
            Err(e) => state.set_error(Form::Transaction, e.to_string()),
        }
    }

    pub(in crate::app) fn on_transaction_deleted(&mut self, id: String, result: Result<()>) {
        self.end_form();
        let mut state = self.state.write();
        match result {
            Ok(()) => {
                state.transactions.remove(&id);
                state.clear_error(Form::Transaction);
            }
            Err(e) => state.set_error(Form::Transaction, e.to_string()),
        }
    }
}
