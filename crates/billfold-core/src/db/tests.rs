//! Database tests

use chrono::Utc;

use super::*;
use crate::models::{BudgetProfile, Category, NewExpense};

fn sample_profile(user_id: i64) -> BudgetProfile {
    BudgetProfile {
        user_id,
        income: 3000.0,
        budget_rent: 1200.0,
        budget_food: 400.0,
        budget_clothing: 100.0,
        budget_electronics: 50.0,
        budget_travel: 150.0,
        budget_medical: 80.0,
        budget_other: 120.0,
    }
}

#[test]
fn test_schema_initializes() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
             AND name IN ('users', 'budget_profiles', 'expenses')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn test_create_user_and_lookup() {
    let db = Database::in_memory().unwrap();

    let id = db.create_user("alice", "hash").unwrap();
    assert!(id > 0);

    let user = db.get_user_by_username("alice").unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.password_hash, "hash");

    assert!(db.get_user_by_username("bob").unwrap().is_none());
}

#[test]
fn test_duplicate_username_rejected() {
    let db = Database::in_memory().unwrap();

    db.create_user("alice", "hash").unwrap();
    let err = db.create_user("alice", "other-hash").unwrap_err();
    assert!(matches!(err, crate::error::Error::DuplicateUser(ref name) if name == "alice"));
}

#[test]
fn test_profile_upsert_is_full_replace() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("alice", "hash").unwrap();

    let profile = sample_profile(user_id);
    db.upsert_profile(&profile).unwrap();
    db.upsert_profile(&profile).unwrap();
    assert_eq!(db.count_profiles().unwrap(), 1);
    assert_eq!(db.get_profile(user_id).unwrap().unwrap(), profile);

    // Re-onboarding replaces every field, no merging
    let mut replaced = sample_profile(user_id);
    replaced.income = 5000.0;
    replaced.budget_food = 0.0;
    db.upsert_profile(&replaced).unwrap();
    assert_eq!(db.get_profile(user_id).unwrap().unwrap(), replaced);
}

#[test]
fn test_profile_absent_before_onboarding() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("alice", "hash").unwrap();
    assert!(db.get_profile(user_id).unwrap().is_none());
}

#[test]
fn test_insert_and_list_expenses() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("alice", "hash").unwrap();

    let id = db
        .insert_expense(&NewExpense {
            user_id,
            category: Category::Food,
            amount: 42.5,
            description: "Grocery".into(),
            occurred_at: Utc::now(),
            image_path: Some("uploads/receipt.jpg".into()),
            image_hash: Some("deadbeef".into()),
        })
        .unwrap();

    let expense = db.get_expense(id).unwrap().unwrap();
    assert_eq!(expense.category, Category::Food);
    assert_eq!(expense.amount, 42.5);
    assert_eq!(expense.image_path.as_deref(), Some("uploads/receipt.jpg"));
    assert_eq!(expense.image_hash.as_deref(), Some("deadbeef"));

    let listed = db.list_expenses(user_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);

    // Expenses belong to their user
    let other = db.create_user("bob", "hash").unwrap();
    assert!(db.list_expenses(other).unwrap().is_empty());
}

#[test]
fn test_spent_by_category_groups_sums() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("alice", "hash").unwrap();

    for (category, amount) in [
        (Category::Food, 120.0),
        (Category::Food, 50.0),
        (Category::Travel, 200.0),
    ] {
        db.insert_expense(&NewExpense {
            user_id,
            category,
            amount,
            description: "x".into(),
            occurred_at: Utc::now(),
            image_path: None,
            image_hash: None,
        })
        .unwrap();
    }

    let totals = db.spent_by_category(user_id).unwrap();
    assert_eq!(totals.get(&Category::Food), Some(&170.0));
    assert_eq!(totals.get(&Category::Travel), Some(&200.0));
    assert!(totals.get(&Category::Rent).is_none());
}
