//! Domain models for Outlay

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque identifier of an expense record, stable across refetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub String);

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the account a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logged spending event, immutable once retrieved from the store.
///
/// Serialized field names match the hosted store's document shape
/// (camelCase), so the persistence glue can deserialize batches directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    /// Owning account. Batches are single-account by the caller's
    /// contract; aggregation never checks this field.
    pub owner_id: AccountId,
    pub amount: Decimal,
    /// Raw category label as stored. Unknown labels keep their own
    /// aggregation bucket; they are coerced to [`Category::Other`] only
    /// for icon/badge lookup via [`Category::from_label`].
    pub category: String,
    /// When the expense occurred, not when the record was written.
    pub date: NaiveDate,
    pub description: String,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// The fixed category set the app's forms offer.
///
/// Display-side only: aggregation works on the raw label string so that a
/// label outside this set stays its own bucket instead of silently merging
/// into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Shopping,
    Healthcare,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Shopping,
        Category::Healthcare,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Healthcare => "Healthcare",
            Self::Other => "Other",
        }
    }

    /// Resolve a raw label for presentation, falling back to `Other` for
    /// anything outside the fixed set. Never use this when bucketing
    /// amounts: it would merge unrelated spending.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Other)
    }

    /// Font Awesome icon class for the category badge.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "fa-utensils",
            Self::Transport => "fa-car",
            Self::Utilities => "fa-bolt",
            Self::Entertainment => "fa-film",
            Self::Shopping => "fa-shopping-bag",
            Self::Healthcare => "fa-heart-pulse",
            Self::Other => "fa-circle",
        }
    }

    /// CSS class pair for the category badge element.
    pub fn badge_class(&self) -> String {
        format!("badge badge-{}", self.as_str().to_lowercase())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Self::Food),
            "Transport" => Ok(Self::Transport),
            "Utilities" => Ok(Self::Utilities),
            "Entertainment" => Ok(Self::Entertainment),
            "Shopping" => Ok(Self::Shopping),
            "Healthcare" => Ok(Self::Healthcare),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category filter for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filtering; the batch passes through unchanged.
    All,
    /// Exact-string match on the raw category label.
    Only(String),
}

impl CategoryFilter {
    pub fn only(label: impl Into<String>) -> Self {
        Self::Only(label.into())
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// The sentinel `"all"` (and an empty selection) means no filter;
    /// every other string filters by exact equality.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            other => Ok(Self::Only(other.to_string())),
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(label) => write!(f, "{}", label),
        }
    }
}

/// A draft expense as entered in the add/edit form, before the write path
/// accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl NewExpense {
    /// Guards the write path enforces before persisting a record.
    ///
    /// Aggregation tolerates records that slipped past these (they still
    /// sum arithmetically); it never re-validates.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidExpense("Please enter a valid amount".into()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidExpense("Please select a category".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_from_label_coerces_unknown_to_other() {
        assert_eq!(Category::from_label("Food"), Category::Food);
        assert_eq!(Category::from_label("Subscriptions"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
        // Exact match only, no case folding
        assert_eq!(Category::from_label("food"), Category::Other);
    }

    #[test]
    fn test_category_presentation_lookups() {
        assert_eq!(Category::Food.icon(), "fa-utensils");
        assert_eq!(Category::Other.icon(), "fa-circle");
        assert_eq!(Category::Healthcare.badge_class(), "badge badge-healthcare");
    }

    #[test]
    fn test_filter_sentinel() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Food".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::only("Food")
        );
        // "All" is not the sentinel; equality is exact
        assert_eq!(
            "All".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::only("All")
        );
    }

    #[test]
    fn test_new_expense_validation() {
        let draft = NewExpense {
            amount: dec!(12.50),
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description: String::new(),
        };
        assert!(draft.validate().is_ok());

        let zero = NewExpense {
            amount: Decimal::ZERO,
            ..draft.clone()
        };
        assert!(zero.validate().is_err());

        let negative = NewExpense {
            amount: dec!(-3),
            ..draft.clone()
        };
        assert!(negative.validate().is_err());

        let uncategorized = NewExpense {
            category: "  ".to_string(),
            ..draft
        };
        let err = uncategorized.validate().unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_record_deserializes_from_store_document() {
        let doc = r#"{
            "id": "exp-001",
            "ownerId": "user-42",
            "amount": 19.99,
            "category": "Entertainment",
            "date": "2024-03-11",
            "description": "movie night",
            "createdAt": "2024-03-11T18:04:00Z"
        }"#;
        let record: ExpenseRecord = serde_json::from_str(doc).unwrap();
        assert_eq!(record.id, ExpenseId("exp-001".to_string()));
        assert_eq!(record.owner_id, AccountId("user-42".to_string()));
        assert_eq!(record.amount, dec!(19.99));
        assert_eq!(record.category, "Entertainment");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }
}
