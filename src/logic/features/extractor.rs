//! Static Feature Vector Extractor
//!
//! Two-stage pipeline matching the schema's reference vectorizer: parse the
//! container into a raw-feature record, then project the record into the
//! fixed 2381-value vector. Both stages are pure functions of the input
//! bytes, so extraction is deterministic.

use serde::{Deserialize, Serialize};

use super::bytes::{byte_entropy_process, byte_entropy_raw, byte_histogram_process, byte_histogram_raw};
use super::general::{general_process, general_raw, RawGeneralInfo};
use super::header::{header_process, header_raw, RawHeaderInfo};
use super::imports::{
    data_directories_process, data_directories_raw, exports_process, exports_raw, imports_process,
    imports_raw, RawDataDirectory, RawImports,
};
use super::layout::FEATURE_COUNT;
use super::pe;
use super::sections::{sections_process, sections_raw, RawSectionInfo};
use super::strings::{strings_process, strings_raw, RawStringStats};
use super::vector::FeatureVector;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum ExtractionError {
    /// The input is not a parseable PE container
    Parse(String),
    /// The vectorizer produced the wrong number of values
    Dimension { expected: usize, actual: usize },
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::Parse(msg) => write!(f, "PE parse error: {}", msg),
            ExtractionError::Dimension { expected, actual } => {
                write!(f, "Feature width mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

impl From<goblin::error::Error> for ExtractionError {
    fn from(err: goblin::error::Error) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}

// ============================================================================
// RAW FEATURE RECORD
// ============================================================================

/// Raw-feature record, one field per schema group
///
/// Serializable so that a record can be captured once and re-vectorized or
/// inspected offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeatures {
    pub histogram: Vec<u32>,
    pub byteentropy: Vec<u32>,
    pub strings: RawStringStats,
    pub general: RawGeneralInfo,
    pub header: RawHeaderInfo,
    pub section: RawSectionInfo,
    pub imports: RawImports,
    pub exports: Vec<String>,
    pub datadirectories: Vec<RawDataDirectory>,
}

/// Parse raw bytes into the raw-feature record
pub fn raw_features(data: &[u8]) -> Result<RawFeatures, ExtractionError> {
    let parsed = pe::parse(data)?;

    Ok(RawFeatures {
        histogram: byte_histogram_raw(data),
        byteentropy: byte_entropy_raw(data),
        strings: strings_raw(data),
        general: general_raw(&parsed, data),
        header: header_raw(&parsed),
        section: sections_raw(&parsed, data),
        imports: imports_raw(&parsed),
        exports: exports_raw(&parsed),
        datadirectories: data_directories_raw(&parsed),
    })
}

/// Project a raw-feature record into the fixed-width vector
pub fn vectorize(raw: &RawFeatures) -> Result<FeatureVector, ExtractionError> {
    let mut values = Vec::with_capacity(FEATURE_COUNT);

    byte_histogram_process(&raw.histogram, &mut values);
    byte_entropy_process(&raw.byteentropy, &mut values);
    strings_process(&raw.strings, &mut values);
    general_process(&raw.general, &mut values);
    header_process(&raw.header, &mut values);
    sections_process(&raw.section, &mut values);
    imports_process(&raw.imports, &mut values);
    exports_process(&raw.exports, &mut values);
    data_directories_process(&raw.datadirectories, &mut values);

    if values.len() != FEATURE_COUNT {
        return Err(ExtractionError::Dimension {
            expected: FEATURE_COUNT,
            actual: values.len(),
        });
    }

    Ok(FeatureVector::from_extracted(values))
}

/// Extract the 2381-value feature vector from raw PE bytes
pub fn extract_features(data: &[u8]) -> Result<FeatureVector, ExtractionError> {
    let raw = raw_features(data)?;
    vectorize(&raw)
}
