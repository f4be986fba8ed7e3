//! Budget reconciliation engine
//!
//! Joins the budget profile with per-category ledger sums to produce
//! the dashboard view. Purely read-side: safe to call repeatedly and
//! concurrently.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryStat, DashboardReport};

/// Compute budget-vs-spend for every category
///
/// Categories with no recorded expenses report `spent = 0`. `remaining`
/// is never clamped: a negative value means the category is overspent,
/// which is a valid and meaningful state.
///
/// A user without a profile has not finished onboarding; that surfaces
/// as `ProfileNotFound`, a control-flow branch for the caller rather
/// than a fault.
pub fn reconcile(db: &Database, user_id: i64) -> Result<DashboardReport> {
    let profile = db
        .get_profile(user_id)?
        .ok_or(Error::ProfileNotFound(user_id))?;

    let spent = db.spent_by_category(user_id)?;

    let stats = Category::ALL
        .iter()
        .map(|&category| {
            let budget = profile.budget_for(category);
            let spent = spent.get(&category).copied().unwrap_or(0.0);
            CategoryStat {
                category,
                budget,
                spent,
                remaining: budget - spent,
            }
        })
        .collect();

    Ok(DashboardReport { profile, stats })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{BudgetProfile, NewExpense};

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("alice", "hash").unwrap();
        db.upsert_profile(&BudgetProfile {
            user_id,
            income: 3000.0,
            budget_rent: 1200.0,
            budget_food: 400.0,
            budget_clothing: 100.0,
            budget_electronics: 50.0,
            budget_travel: 150.0,
            budget_medical: 80.0,
            budget_other: 120.0,
        })
        .unwrap();
        (db, user_id)
    }

    fn add_expense(db: &Database, user_id: i64, category: Category, amount: f64) {
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

    #[test]
    fn test_missing_profile_signals_onboarding() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("fresh", "hash").unwrap();

        let err = reconcile(&db, user_id).unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound(id) if id == user_id));
    }

    #[test]
    fn test_empty_ledger_reports_full_budgets() {
        let (db, user_id) = setup();

        let report = reconcile(&db, user_id).unwrap();
        assert_eq!(report.stats.len(), 7);
        for stat in &report.stats {
            assert_eq!(stat.spent, 0.0);
            assert_eq!(stat.remaining, stat.budget);
        }
    }

    #[test]
    fn test_stats_in_canonical_order() {
        let (db, user_id) = setup();

        let report = reconcile(&db, user_id).unwrap();
        let order: Vec<Category> = report.stats.iter().map(|s| s.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn test_food_scenario_sums_correctly() {
        let (db, user_id) = setup();
        add_expense(&db, user_id, Category::Food, 120.0);
        add_expense(&db, user_id, Category::Food, 50.0);

        let report = reconcile(&db, user_id).unwrap();
        let food = report
            .stats
            .iter()
            .find(|s| s.category == Category::Food)
            .unwrap();
        assert_eq!(food.budget, 400.0);
        assert_eq!(food.spent, 170.0);
        assert_eq!(food.remaining, 230.0);
    }

    #[test]
    fn test_overspend_goes_negative() {
        let (db, user_id) = setup();
        add_expense(&db, user_id, Category::Electronics, 125.0);

        let report = reconcile(&db, user_id).unwrap();
        let electronics = report
            .stats
            .iter()
            .find(|s| s.category == Category::Electronics)
            .unwrap();
        assert_eq!(electronics.remaining, -75.0);
    }

    #[test]
    fn test_other_users_spend_is_excluded() {
        let (db, user_id) = setup();
        let other = db.create_user("bob", "hash").unwrap();
        add_expense(&db, other, Category::Food, 999.0);

        let report = reconcile(&db, user_id).unwrap();
        let food = report
            .stats
            .iter()
            .find(|s| s.category == Category::Food)
            .unwrap();
        assert_eq!(food.spent, 0.0);
    }
}
