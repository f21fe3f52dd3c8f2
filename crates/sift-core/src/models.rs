//! Domain models for Sift
//!
//! Wire shapes for the backend REST API. The backend owns the schema; these
//! mirror it closely enough to round-trip without interpretation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: Option<AccountKind>,
    pub balance: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown account kind: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Transaction {
    /// Whether the given field has no committed value yet
    pub fn field_is_empty(&self, field: FieldKind) -> bool {
        match field {
            FieldKind::Payee => self.payee_id.is_none(),
            FieldKind::Category => self.category_id.is_none(),
        }
    }
}

/// A payee known to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A spending category known to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Minimal id/name pair used when passing known entities to the
/// suggestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl From<&Payee> for EntityRef {
    fn from(p: &Payee) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
        }
    }
}

impl From<&Category> for EntityRef {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
        }
    }
}

/// Which transaction field an edit or suggestion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Payee,
    Category,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payee => "payee",
            Self::Category => "category",
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "payee" => Ok(Self::Payee),
            "category" => Ok(Self::Category),
            _ => Err(format!("Unknown field kind: {}", s)),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the user arrived at a committed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// Picked from the suggestion list
    Suggestion,
    /// Typed or picked outside the suggestion list
    Manual,
    /// Accepted an autocomplete completion
    Autocomplete,
}

impl SelectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Manual => "manual",
            Self::Autocomplete => "autocomplete",
        }
    }
}

impl std::str::FromStr for SelectionMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suggestion" => Ok(Self::Suggestion),
            "manual" => Ok(Self::Manual),
            "autocomplete" => Ok(Self::Autocomplete),
            _ => Err(format!("Unknown selection method: {}", s)),
        }
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_round_trip() {
        for kind in [AccountKind::Checking, AccountKind::Savings, AccountKind::Credit] {
            let parsed: AccountKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("brokerage".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_field_kind_round_trip() {
        assert_eq!("payee".parse::<FieldKind>().unwrap(), FieldKind::Payee);
        assert_eq!("Category".parse::<FieldKind>().unwrap(), FieldKind::Category);
        assert!("memo".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_field_is_empty() {
        let mut tx = Transaction {
            id: 1,
            account_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "STARBUCKS #123".to_string(),
            amount: -5.75,
            payee_id: None,
            payee_name: None,
            category_id: Some("c1".to_string()),
            category_name: Some("Coffee".to_string()),
            notes: None,
        };

        assert!(tx.field_is_empty(FieldKind::Payee));
        assert!(!tx.field_is_empty(FieldKind::Category));

        tx.payee_id = Some("p1".to_string());
        assert!(!tx.field_is_empty(FieldKind::Payee));
    }
}
