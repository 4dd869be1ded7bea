//! Attributes Module - Structural Attribute Sidecar
//!
//! Shallow container statistics reported alongside a classification: byte
//! entropy, section/import/export/symbol counts, mapped size, signature
//! presence. Diagnostic only - nothing downstream consumes these.
//!
//! Extraction is best effort and never fails: a container that will not
//! parse degrades to whatever was already computed, with the problem
//! recorded as a warning instead of an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::features::pe;

// ============================================================================
// TYPES
// ============================================================================

/// A single structural attribute value
///
/// Untagged: variant order makes integers deserialize as `Int`, not `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(u64),
    Float(f64),
}

/// Best-effort attribute extraction result
///
/// `warnings` lists the non-fatal problems hit while extracting; a report
/// with warnings still carries every attribute computed before the failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeReport {
    pub attributes: BTreeMap<String, AttributeValue>,
    pub warnings: Vec<String>,
}

impl AttributeReport {
    /// Attribute by name
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ============================================================================
// ENTROPY
// ============================================================================

/// Shannon entropy of the byte distribution, in bits per byte [0, 8]
///
/// Empty input has zero entropy by convention.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 256];
    for &b in data {
        counts[b as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &count in &counts {
        if count > 0 {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
    }
    entropy
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extract structural attributes from raw PE bytes, best effort
pub fn extract_attributes(data: &[u8]) -> AttributeReport {
    let mut report = AttributeReport::default();

    report.attributes.insert(
        "entropy".to_string(),
        AttributeValue::Float(shannon_entropy(data)),
    );

    let parsed = match pe::parse(data) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("Attribute extraction degraded, container did not parse: {}", err);
            report.warnings.push(format!("container did not parse: {}", err));
            return report;
        }
    };

    let virtual_size = parsed
        .header
        .optional_header
        .as_ref()
        .map(|oh| oh.windows_fields.size_of_image as u64)
        .unwrap_or(0);

    // Count imported libraries, not imported functions
    let mut libraries: Vec<&str> = parsed.libraries.clone();
    libraries.sort_unstable();
    libraries.dedup();

    report
        .attributes
        .insert("virtual_size".to_string(), AttributeValue::Int(virtual_size));
    report.attributes.insert(
        "number_of_sections".to_string(),
        AttributeValue::Int(parsed.header.coff_header.number_of_sections as u64),
    );
    report.attributes.insert(
        "imports".to_string(),
        AttributeValue::Int(libraries.len() as u64),
    );
    report.attributes.insert(
        "exports".to_string(),
        AttributeValue::Int(parsed.exports.len() as u64),
    );
    report.attributes.insert(
        "symbols".to_string(),
        AttributeValue::Int(parsed.header.coff_header.number_of_symbol_table as u64),
    );
    report.attributes.insert(
        "has_signature".to_string(),
        AttributeValue::Bool(pe::has_directory(&parsed, pe::DIR_CERTIFICATE)),
    );

    report
}
