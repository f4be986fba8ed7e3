//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use billfold_core::extract::{ExtractorBackend, ExtractorClient};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    uploads_dir: &Path,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Billfold web server...");
    println!("   Database: {}", db_path.display());
    println!("   Uploads: {}", uploads_dir.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Receipt extraction backend: Ollama when OLLAMA_HOST is set,
    // otherwise a canned mock so the rest of the app stays usable.
    let extractor = match ExtractorClient::from_env() {
        Some(client) => {
            println!(
                "   🤖 Extraction backend: {} (model: {})",
                client.host(),
                client.model()
            );
            client
        }
        None => {
            println!("   ⚠️  OLLAMA_HOST not set - using mock extraction backend");
            println!("      Receipt uploads will produce canned results.");
            ExtractorClient::mock()
        }
    };

    // Parse allowed CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("BILLFOLD_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = billfold_server::ServerConfig { allowed_origins };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    billfold_server::serve(db, extractor, host, port, uploads_dir, static_dir_str, config).await?;

    Ok(())
}
