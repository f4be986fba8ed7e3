//! Status command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Billfold Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        println!();
        println!("   Run 'billfold init' to create it.");
        println!();
        return Ok(());
    }

    match open_db(db_path) {
        Ok(db) => {
            let users = db.count_users()?;
            let profiles = db.count_profiles()?;
            let (expense_count, total_spent) = db.expense_totals()?;

            println!();
            println!("   Users: {}", users);
            println!("   Budget profiles: {}", profiles);
            println!("   Expenses: {} (${:.2} total)", expense_count, total_spent);

            if users > profiles {
                println!();
                println!(
                    "   💡 {} user(s) have not completed onboarding yet.",
                    users - profiles
                );
            }
        }
        Err(e) => {
            println!();
            println!("   ❌ Error opening database: {}", e);
        }
    }

    println!();
    Ok(())
}
