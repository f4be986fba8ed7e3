//! Domain models for Billfold

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A budget category
///
/// The category set is closed: every budget line and every expense maps
/// to exactly one of these seven values. Extraction output naming any
/// other category is a validation failure, never silently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Rent,
    Food,
    Clothing,
    Electronics,
    Travel,
    Medical,
    Other,
}

impl Category {
    /// All categories in canonical dashboard order
    pub const ALL: [Category; 7] = [
        Self::Rent,
        Self::Food,
        Self::Clothing,
        Self::Electronics,
        Self::Travel,
        Self::Medical,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Food => "Food",
            Self::Clothing => "Clothing",
            Self::Electronics => "Electronics",
            Self::Travel => "Travel",
            Self::Medical => "Medical",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-insensitive exact match against the closed set. No fuzzy or
    /// nearest-match guessing.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rent" => Ok(Self::Rent),
            "food" => Ok(Self::Food),
            "clothing" => Ok(Self::Clothing),
            "electronics" => Ok(Self::Electronics),
            "travel" => Ok(Self::Travel),
            "medical" => Ok(Self::Medical),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 hash, never serialized out
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user's budget allocation across the category set
///
/// One per user. Re-submission fully replaces the stored record; partial
/// updates are unsupported on purpose so onboarding stays idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProfile {
    pub user_id: i64,
    pub income: f64,
    pub budget_rent: f64,
    pub budget_food: f64,
    pub budget_clothing: f64,
    pub budget_electronics: f64,
    pub budget_travel: f64,
    pub budget_medical: f64,
    pub budget_other: f64,
}

impl BudgetProfile {
    /// Budget allocated to a category
    pub fn budget_for(&self, category: Category) -> f64 {
        match category {
            Category::Rent => self.budget_rent,
            Category::Food => self.budget_food,
            Category::Clothing => self.budget_clothing,
            Category::Electronics => self.budget_electronics,
            Category::Travel => self.budget_travel,
            Category::Medical => self.budget_medical,
            Category::Other => self.budget_other,
        }
    }
}

/// A categorized expense in the ledger
///
/// Created exactly once by the ingestion pipeline on a successful
/// extraction; never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    pub amount: f64,
    pub description: String,
    /// Ingestion time, not the purchase date printed on the receipt
    pub occurred_at: DateTime<Utc>,
    /// Stored receipt image location; None only for expenses created
    /// outside the receipt pipeline
    pub image_path: Option<String>,
    /// SHA-256 of the stored image bytes, hex encoded
    pub image_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new expense row
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: i64,
    pub category: Category,
    pub amount: f64,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
    pub image_path: Option<String>,
    pub image_hash: Option<String>,
}

/// Structured purchase data proposed by the extraction service and
/// validated against the category taxonomy and numeric constraints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseCandidate {
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

/// One dashboard row: budget vs spend for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: Category,
    pub budget: f64,
    pub spent: f64,
    /// May be negative; overspend is a meaningful state, not an error
    pub remaining: f64,
}

/// Full dashboard report: profile plus the seven category rows in
/// canonical order
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub profile: BudgetProfile,
    pub stats: Vec<CategoryStat>,
}

/// A receipt file as received from the caller, before anything has been
/// persisted
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    /// Original filename as declared by the client (untrusted)
    pub file_name: String,
    /// Declared MIME type, forwarded to the extraction service as-is
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn test_category_case_insensitive() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("ELECTRONICS".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!(" Travel ".parse::<Category>().unwrap(), Category::Travel);
    }

    #[test]
    fn test_category_closed_set() {
        assert!("Toys".parse::<Category>().is_err());
        assert!("groceries".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_budget_for() {
        let profile = BudgetProfile {
            user_id: 1,
            income: 3000.0,
            budget_rent: 1200.0,
            budget_food: 400.0,
            budget_clothing: 100.0,
            budget_electronics: 50.0,
            budget_travel: 150.0,
            budget_medical: 80.0,
            budget_other: 120.0,
        };
        assert_eq!(profile.budget_for(Category::Rent), 1200.0);
        assert_eq!(profile.budget_for(Category::Food), 400.0);
        assert_eq!(profile.budget_for(Category::Other), 120.0);
    }
}
