//! Feature Layout - Centralized Feature Schema Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The 2381-dim vector layout is a fixed external contract shared with the
//! pretrained models. The models were trained on vectors produced by schema
//! version 2; reordering, resizing or re-deriving any group silently produces
//! garbage predictions.
//!
//! ## Rules (NEVER break these):
//! 1. Add a group -> increment FEATURE_VERSION
//! 2. Change order or a group width -> increment FEATURE_VERSION
//! 3. Remove a group -> increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature schema version
pub const FEATURE_VERSION: u8 = 2;

// ============================================================================
// GROUP LAYOUT (Authoritative source)
// ============================================================================

/// Feature groups in the exact order they appear in the vector,
/// with their widths. This is the SINGLE SOURCE OF TRUTH for the layout.
pub const GROUP_LAYOUT: &[(&str, usize)] = &[
    ("histogram", 256),       // 0..256: normalized byte-value histogram
    ("byteentropy", 256),     // 256..512: windowed entropy x byte joint histogram
    ("strings", 104),         // 512..616: printable-string statistics
    ("general", 10),          // 616..626: shallow container counters
    ("header", 62),           // 626..688: COFF/optional header fields + hashed tokens
    ("section", 255),         // 688..943: section table statistics + hashed slots
    ("imports", 1280),        // 943..2223: hashed import libraries and functions
    ("exports", 128),         // 2223..2351: hashed export names
    ("datadirectories", 30),  // 2351..2381: (size, vaddr) of the 15 directories
];

/// Total number of features
pub const FEATURE_COUNT: usize = 2381;

/// Offset of a group inside the vector, by layout position
pub fn group_offset(name: &str) -> Option<usize> {
    let mut offset = 0;
    for (group, dim) in GROUP_LAYOUT {
        if *group == name {
            return Some(offset);
        }
        offset += dim;
    }
    None
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all group names and widths in order
    for (name, dim) in GROUP_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&(*dim as u32).to_le_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash (inputs are const, so this is stable per build)
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// VALIDATION
// ============================================================================

/// A vector was produced under a different schema than this build expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature Layout Mismatch: Expected v{} ({:x}), Got v{} ({:x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate a (version, hash) pair against the current schema
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    if version == FEATURE_VERSION && hash == layout_hash() {
        Ok(())
    } else {
        Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: layout_hash(),
            actual_version: version,
            actual_hash: hash,
        })
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub groups: Vec<(String, usize)>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            groups: GROUP_LAYOUT
                .iter()
                .map(|(name, dim)| (name.to_string(), *dim))
                .collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}
