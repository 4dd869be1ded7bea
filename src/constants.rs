//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default artifact locations, only edit this file.

use std::path::PathBuf;

/// Default path of the "soft" model artifact (gradient boosted trees, ONNX export)
pub const DEFAULT_SOFT_MODEL_PATH: &str = "models/xgboost.onnx";

/// Default path of the "hard" model artifact (random forest, ONNX export)
pub const DEFAULT_HARD_MODEL_PATH: &str = "models/random_forest.onnx";

/// Default path of the family hash database artifact
///
/// JSON object mapping family name -> 64-hex-char representative digest.
pub const DEFAULT_FAMILY_DB_PATH: &str = "models/family_hashes.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "maldetect-core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get soft model path from environment or use default
pub fn get_soft_model_path() -> PathBuf {
    std::env::var("MALDETECT_SOFT_MODEL")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOFT_MODEL_PATH))
}

/// Get hard model path from environment or use default
pub fn get_hard_model_path() -> PathBuf {
    std::env::var("MALDETECT_HARD_MODEL")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_HARD_MODEL_PATH))
}

/// Get family hash database path from environment or use default
pub fn get_family_db_path() -> PathBuf {
    std::env::var("MALDETECT_FAMILY_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FAMILY_DB_PATH))
}
