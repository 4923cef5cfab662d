use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, MAX_CENTS, format_cents};

/// Identifier of a transaction, derived from its creation time in milliseconds.
pub type TransactionId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a description")]
    EmptyDescription,

    #[error("Please enter a valid amount (must be greater than zero, got {0} cents)")]
    NonPositiveAmount(Cents),

    #[error("Amount is too large (at most {} allowed)", format_cents(MAX_CENTS))]
    AmountTooLarge(Cents),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transaction type '{0}'. Valid types: income, expense")]
    InvalidKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    /// Sign shown in front of amounts of this kind.
    pub fn sign(&self) -> char {
        match self {
            Kind::Income => '+',
            Kind::Expense => '-',
        }
    }
}

impl FromStr for Kind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            _ => Err(ValidationError::InvalidKind(s.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spending/earning category. Values that don't match a known category are
/// kept verbatim in `Custom` so older data survives a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Salary,
    Food,
    Shopping,
    Transport,
    Bills,
    Other,
    Custom(String),
}

impl Category {
    pub const KNOWN: [Category; 6] = [
        Category::Salary,
        Category::Food,
        Category::Shopping,
        Category::Transport,
        Category::Bills,
        Category::Other,
    ];

    /// Stored key of the category.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Salary => "salary",
            Category::Food => "food",
            Category::Shopping => "shopping",
            Category::Transport => "transport",
            Category::Bills => "bills",
            Category::Other => "other",
            Category::Custom(value) => value,
        }
    }

    /// Human readable label. Custom values are returned unchanged.
    pub fn label(&self) -> &str {
        match self {
            Category::Salary => "Salary",
            Category::Food => "Food & Dining",
            Category::Shopping => "Shopping",
            Category::Transport => "Transportation",
            Category::Bills => "Bills",
            Category::Other => "Other",
            Category::Custom(value) => value,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }

    /// Interpret user input: known keys match case-insensitively, anything
    /// else is kept as trimmed free text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        match Category::from(trimmed.to_lowercase()) {
            Category::Custom(_) => Category::Custom(trimmed.to_string()),
            known => known,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "salary" => Category::Salary,
            "food" => Category::Food,
            "shopping" => Category::Shopping,
            "transport" => Category::Transport,
            "bills" => Category::Bills,
            "other" => Category::Other,
            _ => Category::Custom(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from_input(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded income or expense. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord", into = "TransactionRecord")]
pub struct Transaction {
    id: TransactionId,
    description: String,
    amount: Cents,
    kind: Kind,
    category: Category,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Build a transaction, checking that the description is non-empty once
    /// trimmed and that the amount is positive and at most [`MAX_CENTS`].
    pub fn new(
        id: TransactionId,
        description: &str,
        amount: Cents,
        kind: Kind,
        category: Category,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if amount > MAX_CENTS {
            return Err(ValidationError::AmountTooLarge(amount));
        }

        Ok(Self {
            id,
            description: description.to_string(),
            amount,
            kind,
            category,
            timestamp,
        })
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Amount in cents, always positive.
    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_income(&self) -> bool {
        self.kind == Kind::Income
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            Kind::Income => self.amount,
            Kind::Expense => -self.amount,
        }
    }
}

/// Persisted shape of a transaction. Accepts the `desc`, `type` and `date`
/// field names written by the browser version of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    #[serde(alias = "desc")]
    description: String,
    #[serde(with = "super::money::units")]
    amount: Cents,
    #[serde(alias = "type")]
    kind: Kind,
    category: Category,
    #[serde(alias = "date")]
    timestamp: DateTime<Utc>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = ValidationError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        Transaction::new(
            record.id,
            &record.description,
            record.amount,
            record.kind,
            record.category,
            record.timestamp,
        )
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            description: transaction.description,
            amount: transaction.amount,
            kind: transaction.kind,
            category: transaction.category,
            timestamp: transaction.timestamp,
        }
    }
}
