//! # Transactions Slice
//!
//! The in-memory transaction list, its fetch status and the UI filter.
//!
//! The reducers only ever touch this slice; the app layer calls them when a
//! service result comes back.

use shared::{Transaction, TransactionQuery, TransactionType, TransactionUpdate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Credit,
    Debit,
}

impl TypeFilter {
    fn as_type(self) -> Option<TransactionType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Credit => Some(TransactionType::Credit),
            TypeFilter::Debit => Some(TransactionType::Debit),
        }
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            other => other.parse::<TransactionType>().map(|kind| match kind {
                TransactionType::Credit => TypeFilter::Credit,
                TransactionType::Debit => TypeFilter::Debit,
            }),
        }
    }
}

/// Filter as the user edits it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: TypeFilter,
    pub category: Option<String>,
    /// `yyyy-MM-dd`
    pub start_date: Option<String>,
    /// `yyyy-MM-dd`, inclusive
    pub end_date: Option<String>,
    pub search_term: String,
}

impl TransactionFilter {
    /// Server-side query for this filter. `All` sends no type and the
    /// search term travels as `description`.
    pub fn to_query(&self) -> TransactionQuery {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        TransactionQuery {
            kind: self.kind.as_type(),
            category: non_empty(&self.category),
            start_date: non_empty(&self.start_date),
            end_date: non_empty(&self.end_date),
            description: Some(self.search_term.trim().to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    /// Client-side check, for lists that were fetched under another filter.
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(kind) = self.kind.as_type() {
            if tx.kind != kind {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if !tx.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        // ISO dates compare correctly as strings; only the day part matters
        let day = tx.date.get(..10).unwrap_or(tx.date.as_str());
        if let Some(start) = self.start_date.as_deref().filter(|d| !d.is_empty()) {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end_date.as_deref().filter(|d| !d.is_empty()) {
            if day > end {
                return false;
            }
        }

        let term = self.search_term.trim().to_lowercase();
        term.is_empty() || tx.description.to_lowercase().contains(&term)
    }
}

/// Partial filter change; `None` leaves a field as it is.
///
/// The nested options on the nullable fields distinguish "leave" (`None`)
/// from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub kind: Option<TypeFilter>,
    pub category: Option<Option<String>>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsState {
    pub items: Vec<Transaction>,
    pub status: FetchStatus,
    pub error: Option<String>,
    pub filter: TransactionFilter,
}

impl TransactionsState {
    pub fn set_filter(&mut self, update: FilterUpdate) {
        if let Some(kind) = update.kind {
            self.filter.kind = kind;
        }
        if let Some(category) = update.category {
            self.filter.category = category;
        }
        if let Some(start) = update.start_date {
            self.filter.start_date = start;
        }
        if let Some(end) = update.end_date {
            self.filter.end_date = end;
        }
        if let Some(term) = update.search_term {
            self.filter.search_term = term;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filter = TransactionFilter::default();
    }

    pub fn fetch_pending(&mut self) {
        self.status = FetchStatus::Loading;
    }

    pub fn fetch_fulfilled(&mut self, items: Vec<Transaction>) {
        self.status = FetchStatus::Succeeded;
        self.items = items;
        self.error = None;
    }

    /// Keeps the previous items so the list does not flash empty.
    pub fn fetch_rejected(&mut self, error: impl Into<String>) {
        self.status = FetchStatus::Failed;
        self.error = Some(error.into());
    }

    /// A pending fetch was abandoned; the list is left as it was.
    pub fn fetch_cancelled(&mut self) {
        if self.status == FetchStatus::Loading {
            self.status = if self.error.is_some() {
                FetchStatus::Failed
            } else if self.items.is_empty() {
                FetchStatus::Idle
            } else {
                FetchStatus::Succeeded
            };
        }
    }

    /// Newly created transactions go first.
    pub fn prepend(&mut self, tx: Transaction) {
        self.items.insert(0, tx);
    }

    /// Swap in the updated copy; returns false if the id is not loaded.
    pub fn replace(&mut self, tx: Transaction) -> bool {
        match self.items.iter_mut().find(|existing| existing.id == tx.id) {
            Some(slot) => {
                *slot = tx;
                true
            }
            None => false,
        }
    }

    /// Apply an acknowledged update to the loaded copy.
    pub fn apply_update(&mut self, id: &str, update: &TransactionUpdate) -> bool {
        match self.items.iter_mut().find(|existing| existing.id == id) {
            Some(slot) => {
                update.apply_to(slot);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Transaction> {
        let index = self.items.iter().position(|tx| tx.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &Transaction> {
        self.items.iter().filter(|tx| self.filter.matches(tx))
    }
}
