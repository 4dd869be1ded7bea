//! Family Module - Malware Family Attribution
//!
//! - `database` - XOR-folded representative hash database (JSON artifact)
//! - `attribution` - Hamming-distance nearest-family lookup

pub mod attribution;
pub mod database;

// Re-export common types
pub use attribution::{hamming_distance, sha256_hex, FamilyAttributor, FamilyMatch};
pub use database::{FamilyHashDatabase, LookupError};
