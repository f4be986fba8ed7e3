//! Expense ledger operations

use std::collections::HashMap;
use std::str::FromStr;

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, Expense, NewExpense};

impl Database {
    /// Insert a new expense row, returning its id
    ///
    /// This is the only write path into the ledger; rows are never
    /// updated or deleted afterwards.
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO expenses (user_id, category, amount, description, occurred_at, image_path, image_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                expense.user_id,
                expense.category.as_str(),
                expense.amount,
                expense.description,
                expense.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                expense.image_path,
                expense.image_hash,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single expense by id
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        use rusqlite::OptionalExtension;

        let conn = self.conn()?;

        let expense = conn
            .query_row(
                "SELECT id, user_id, category, amount, description, occurred_at, image_path, image_hash, created_at
                 FROM expenses WHERE id = ?1",
                params![id],
                Self::row_to_expense,
            )
            .optional()?;

        Ok(expense)
    }

    /// List a user's expenses, newest first
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, category, amount, description, occurred_at, image_path, image_hash, created_at
             FROM expenses WHERE user_id = ?1
             ORDER BY occurred_at DESC, id DESC",
        )?;

        let expenses = stmt
            .query_map(params![user_id], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Sum of expense amounts per category for a user
    ///
    /// Categories with no recorded expenses are absent from the map;
    /// the reconciliation engine treats absence as zero spend.
    pub fn spent_by_category(&self, user_id: i64) -> Result<HashMap<Category, f64>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) FROM expenses
             WHERE user_id = ?1 GROUP BY category",
        )?;

        let mut totals = HashMap::new();
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        for row in rows {
            let (category_str, total) = row?;
            // Rows were written through the Category enum, so this only
            // fails if the database was edited out-of-band.
            if let Ok(category) = Category::from_str(&category_str) {
                totals.insert(category, total);
            } else {
                tracing::warn!(category = %category_str, "Skipping expense row with unknown category");
            }
        }

        Ok(totals)
    }

    /// Count ledger rows and total spend (for status reporting)
    pub fn expense_totals(&self) -> Result<(i64, f64)> {
        let conn = self.conn()?;
        let totals = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM expenses",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(totals)
    }

    fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
        let category_str: String = row.get(2)?;
        let category = Category::from_str(&category_str).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown category: {}", category_str).into(),
            )
        })?;

        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category,
            amount: row.get(3)?,
            description: row.get(4)?,
            occurred_at: parse_datetime(&row.get::<_, String>(5)?),
            image_path: row.get(6)?,
            image_hash: row.get(7)?,
            created_at: parse_datetime(&row.get::<_, String>(8)?),
        })
    }
}
