//! Budget profile operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;
use crate::models::BudgetProfile;

impl Database {
    /// Store a budget profile, replacing any existing one for the user
    ///
    /// Full-replace semantics: re-submitting onboarding overwrites every
    /// field. Submitting the same payload twice yields the same row.
    pub fn upsert_profile(&self, profile: &BudgetProfile) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO budget_profiles
             (user_id, income, budget_rent, budget_food, budget_clothing,
              budget_electronics, budget_travel, budget_medical, budget_other)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                profile.user_id,
                profile.income,
                profile.budget_rent,
                profile.budget_food,
                profile.budget_clothing,
                profile.budget_electronics,
                profile.budget_travel,
                profile.budget_medical,
                profile.budget_other,
            ],
        )?;

        Ok(())
    }

    /// Fetch the budget profile for a user, if onboarding has happened
    pub fn get_profile(&self, user_id: i64) -> Result<Option<BudgetProfile>> {
        let conn = self.conn()?;

        let profile = conn
            .query_row(
                "SELECT user_id, income, budget_rent, budget_food, budget_clothing,
                        budget_electronics, budget_travel, budget_medical, budget_other
                 FROM budget_profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(BudgetProfile {
                        user_id: row.get(0)?,
                        income: row.get(1)?,
                        budget_rent: row.get(2)?,
                        budget_food: row.get(3)?,
                        budget_clothing: row.get(4)?,
                        budget_electronics: row.get(5)?,
                        budget_travel: row.get(6)?,
                        budget_medical: row.get(7)?,
                        budget_other: row.get(8)?,
                    })
                },
            )
            .optional()?;

        Ok(profile)
    }

    /// Count stored profiles (for status reporting)
    pub fn count_profiles(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM budget_profiles", [], |row| row.get(0))?;
        Ok(count)
    }
}
