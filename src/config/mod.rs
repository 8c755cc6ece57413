use std::env;
use std::path::PathBuf;

/// Configuration for the upload directory and admission rules
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Flat directory holding stored uploads (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum file size in bytes (default: 25 MB)
    pub max_file_size: usize,

    /// Sniff uploaded bytes for binary content (default: true)
    pub verify_text_content: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_file_size: 25 * 1024 * 1024, // 25 MB
            verify_text_content: true,
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            verify_text_content: env::var("VERIFY_TEXT_CONTENT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.verify_text_content),
        }
    }

    /// Create config rooted at an explicit directory (used by tests and tooling)
    pub fn development(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_file_size: 1024 * 1024,
            verify_text_content: true,
        }
    }
}
