use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// The fixed category list offered by the transaction form.
pub const TRANSACTION_CATEGORIES: [&str; 15] = [
    "Food & Drink",
    "Groceries",
    "Shopping",
    "Entertainment",
    "Transportation",
    "Housing",
    "Utilities",
    "Healthcare",
    "Personal Care",
    "Education",
    "Travel",
    "Gifts",
    "Investments",
    "Income",
    "Other",
];

/// Direction of money flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in (income)
    Credit,
    /// Money out (expense)
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "credit" | "income" => Ok(TransactionType::Credit),
            "debit" | "expense" => Ok(TransactionType::Debit),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

/// Payment instrument used for a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionMethod {
    Cash,
    CreditCard,
    DebitCard,
    Upi,
    NetBanking,
    Other,
}

impl TransactionMethod {
    pub fn all() -> &'static [TransactionMethod] {
        &[
            TransactionMethod::Cash,
            TransactionMethod::CreditCard,
            TransactionMethod::DebitCard,
            TransactionMethod::Upi,
            TransactionMethod::NetBanking,
            TransactionMethod::Other,
        ]
    }

    /// Wire value, also used as the query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionMethod::Cash => "CASH",
            TransactionMethod::CreditCard => "CREDIT_CARD",
            TransactionMethod::DebitCard => "DEBIT_CARD",
            TransactionMethod::Upi => "UPI",
            TransactionMethod::NetBanking => "NET_BANKING",
            TransactionMethod::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionMethod::Cash => "Cash",
            TransactionMethod::CreditCard => "Credit Card",
            TransactionMethod::DebitCard => "Debit Card",
            TransactionMethod::Upi => "UPI",
            TransactionMethod::NetBanking => "Net Banking",
            TransactionMethod::Other => "Other",
        }
    }
}

impl std::str::FromStr for TransactionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        TransactionMethod::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown transaction method: {}", s))
    }
}

/// Supported currencies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            other => Err(format!("unsupported currency: {}", other)),
        }
    }
}

/// A transaction as stored by the backend.
///
/// `id` accepts both string and numeric ids; it is empty when the server
/// omitted it (see the create fallback in the client).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_method: Option<TransactionMethod>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("invalid transaction id: {}", other))),
    }
}

/// Create payload (`POST /transactions/create`); the server assigns id, user and date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_method: Option<TransactionMethod>,
}

/// Partial update payload (`PUT /transactions/{id}`); only `Some` fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_method: Option<TransactionMethod>,
}

impl TransactionUpdate {
    /// Apply the present fields to a local copy of the transaction.
    pub fn apply_to(&self, tx: &mut Transaction) {
        if let Some(v) = &self.description {
            tx.description = v.clone();
        }
        if let Some(v) = self.amount {
            tx.amount = v;
        }
        if let Some(v) = self.currency {
            tx.currency = Some(v);
        }
        if let Some(v) = &self.category {
            tx.category = v.clone();
        }
        if let Some(v) = self.kind {
            tx.kind = v;
        }
        if let Some(v) = &self.date {
            tx.date = v.clone();
        }
        if let Some(v) = &self.notes {
            tx.notes = Some(v.clone());
        }
        if let Some(v) = self.transaction_method {
            tx.transaction_method = Some(v);
        }
    }
}

/// Server-side filters for `GET /transactions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub currency: Option<Currency>,
    pub transaction_method: Option<TransactionMethod>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TransactionQuery {
    /// Query string pairs in backend parameter names. Absent and empty values are dropped.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                pairs.push((key.to_string(), value));
            }
        };

        push("type", self.kind.map(|k| k.as_str().to_string()));
        push("category", self.category.clone());
        push("currency", self.currency.map(|c| c.code().to_string()));
        push(
            "transactionMethod",
            self.transaction_method.map(|m| m.as_str().to_string()),
        );
        push("minAmount", self.min_amount.map(|v| v.to_string()));
        push("maxAmount", self.max_amount.map(|v| v.to_string()));
        push("startDate", self.start_date.clone());
        push("endDate", self.end_date.clone());
        push("description", self.description.clone());
        push("page", self.page.map(|v| v.to_string()));
        push("limit", self.limit.map(|v| v.to_string()));
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }
}

/// The normalized transaction list handed to callers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

/// The response shapes `GET /transactions` is allowed to return.
///
/// `{ "data": [...], "totalCount": n }` is the documented envelope; the bare
/// array and `{ "transactions": [...] }` forms are still accepted from older
/// backend revisions. Anything else is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransactionListEnvelope {
    Data {
        data: Vec<Transaction>,
        #[serde(rename = "totalCount", default)]
        total_count: Option<u64>,
    },
    Named {
        transactions: Vec<Transaction>,
        #[serde(rename = "totalCount", default)]
        total_count: Option<u64>,
    },
    Bare(Vec<Transaction>),
}

impl From<TransactionListEnvelope> for TransactionPage {
    fn from(envelope: TransactionListEnvelope) -> Self {
        match envelope {
            TransactionListEnvelope::Data { data, total_count } => TransactionPage {
                transactions: data,
                total_count,
            },
            TransactionListEnvelope::Named {
                transactions,
                total_count,
            } => TransactionPage {
                transactions,
                total_count,
            },
            TransactionListEnvelope::Bare(transactions) => TransactionPage {
                transactions,
                total_count: None,
            },
        }
    }
}

/// Single-transaction responses: `{ "transaction": {...} }` or the bare object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransactionEnvelope {
    Wrapped { transaction: Transaction },
    Bare(Transaction),
}

impl TransactionEnvelope {
    pub fn into_inner(self) -> Transaction {
        match self {
            TransactionEnvelope::Wrapped { transaction } => transaction,
            TransactionEnvelope::Bare(transaction) => transaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee_json() -> &'static str {
        r#"{"id":"t1","description":"Coffee","amount":4.5,"category":"Food & Drink","type":"debit","date":"2024-05-01","transactionMethod":"UPI","currency":"INR"}"#
    }

    #[test]
    fn test_transaction_deserializes_wire_names() {
        let tx: Transaction = serde_json::from_str(coffee_json()).unwrap();
        assert_eq!(tx.id, "t1");
        assert_eq!(tx.kind, TransactionType::Debit);
        assert_eq!(tx.transaction_method, Some(TransactionMethod::Upi));
        assert_eq!(tx.currency, Some(Currency::Inr));
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let tx: Transaction =
            serde_json::from_str(r#"{"id":42,"amount":1.0,"type":"credit"}"#).unwrap();
        assert_eq!(tx.id, "42");
        assert!(tx.date.is_empty());
    }

    #[test]
    fn test_new_transaction_serializes_type_field() {
        let new_tx = NewTransaction {
            description: "Coffee".to_string(),
            amount: 4.5,
            currency: None,
            category: "Food & Drink".to_string(),
            kind: TransactionType::Debit,
            notes: None,
            transaction_method: Some(TransactionMethod::CreditCard),
        };
        let json = serde_json::to_value(&new_tx).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["transactionMethod"], "CREDIT_CARD");
        assert!(json.get("currency").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_list_envelopes() {
        let bare = format!("[{}]", coffee_json());
        let named = format!(r#"{{"transactions":[{}],"totalCount":7}}"#, coffee_json());
        let data = format!(r#"{{"data":[{}]}}"#, coffee_json());

        let page: TransactionPage = serde_json::from_str::<TransactionListEnvelope>(&bare)
            .unwrap()
            .into();
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.total_count, None);

        let page: TransactionPage = serde_json::from_str::<TransactionListEnvelope>(&named)
            .unwrap()
            .into();
        assert_eq!(page.total_count, Some(7));

        let page: TransactionPage = serde_json::from_str::<TransactionListEnvelope>(&data)
            .unwrap()
            .into();
        assert_eq!(page.transactions[0].description, "Coffee");
    }

    #[test]
    fn test_unknown_list_shape_is_rejected() {
        let other = format!(r#"{{"items":[{}],"tags":[]}}"#, coffee_json());
        assert!(serde_json::from_str::<TransactionListEnvelope>(&other).is_err());
    }

    #[test]
    fn test_single_envelopes() {
        let wrapped = format!(r#"{{"transaction":{}}}"#, coffee_json());
        let tx = serde_json::from_str::<TransactionEnvelope>(&wrapped)
            .unwrap()
            .into_inner();
        assert_eq!(tx.id, "t1");

        let tx = serde_json::from_str::<TransactionEnvelope>(coffee_json())
            .unwrap()
            .into_inner();
        assert_eq!(tx.amount, 4.5);
    }

    #[test]
    fn test_query_pairs_skip_empty_values() {
        let query = TransactionQuery {
            kind: Some(TransactionType::Credit),
            category: Some(String::new()),
            min_amount: Some(10.0),
            description: Some("rent".to_string()),
            page: Some(2),
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("type".to_string(), "credit".to_string()),
                ("minAmount".to_string(), "10".to_string()),
                ("description".to_string(), "rent".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
        assert!(TransactionQuery::default().is_empty());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut tx: Transaction = serde_json::from_str(coffee_json()).unwrap();
        let update = TransactionUpdate {
            amount: Some(5.25),
            notes: Some("large".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut tx);
        assert_eq!(tx.amount, 5.25);
        assert_eq!(tx.notes.as_deref(), Some("large"));
        assert_eq!(tx.description, "Coffee");

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_method_and_currency_parsing() {
        assert_eq!("credit card".parse::<TransactionMethod>(), Ok(TransactionMethod::CreditCard));
        assert_eq!("NET_BANKING".parse::<TransactionMethod>(), Ok(TransactionMethod::NetBanking));
        assert!("cheque".parse::<TransactionMethod>().is_err());
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Debit));
    }
}
