//! Receipt image storage
//!
//! Raw uploads are written to disk before extraction is attempted, so
//! the original evidence survives a failed extraction. Images orphaned
//! by failed extractions are kept; cleanup is out of scope.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;

/// Monotonic suffix so two uploads in the same millisecond cannot collide
static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// A receipt image persisted to the upload directory
#[derive(Debug, Clone)]
pub struct StoredReceipt {
    /// Stable location reference recorded on the eventual expense row
    pub path: String,
    /// SHA-256 of the image bytes, hex encoded
    pub content_hash: String,
}

/// Filesystem store for uploaded receipt images
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    dir: PathBuf,
}

impl ReceiptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist raw image bytes under a uniquely named file
    ///
    /// The filename is a UTC timestamp plus the sanitized original name;
    /// sanitizing strips anything that could traverse out of the upload
    /// directory.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredReceipt> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }

        let seq = UPLOAD_SEQ.fetch_add(1, Ordering::SeqCst);
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let filename = format!("{}_{}_{}", timestamp, seq, sanitize_filename(original_name));
        let path = self.dir.join(&filename);

        std::fs::write(&path, bytes)?;

        let content_hash = hex::encode(Sha256::digest(bytes));
        debug!(path = %path.display(), hash = %content_hash, "Stored receipt image");

        Ok(StoredReceipt {
            path: path.to_string_lossy().to_string(),
            content_hash,
        })
    }
}

/// Reduce an untrusted filename to a safe basename
///
/// Keeps alphanumerics, dots, dashes and underscores; everything else
/// (path separators included) becomes an underscore. A name with no
/// usable characters falls back to "receipt".
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "receipt".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\evil.jpg"), "evil.jpg");
        assert_eq!(sanitize_filename("my receipt (1).jpg"), "my_receipt__1_.jpg");
        assert_eq!(sanitize_filename("receipt.jpg"), "receipt.jpg");
    }

    #[test]
    fn test_sanitize_filename_empty_fallback() {
        assert_eq!(sanitize_filename(""), "receipt");
        assert_eq!(sanitize_filename("///"), "receipt");
    }

    #[test]
    fn test_save_writes_unique_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path());

        let first = store.save("bill.jpg", b"one").unwrap();
        let second = store.save("bill.jpg", b"two").unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(std::fs::read(&first.path).unwrap(), b"one");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"two");
    }

    #[test]
    fn test_save_records_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path());

        let stored = store.save("bill.jpg", b"image-bytes").unwrap();
        assert_eq!(stored.content_hash, hex::encode(Sha256::digest(b"image-bytes")));
    }
}
