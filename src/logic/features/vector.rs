//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Carries the schema version and a CRC32 layout hash next to the values so
//! that a vector produced under a different schema is rejected before it can
//! silently feed garbage into the models.

use serde::{Deserialize, Serialize};

use super::layout::{layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_VERSION};

/// Versioned feature vector
///
/// `values` always holds exactly [`FEATURE_COUNT`] f32 values in schema
/// order; construction enforces the width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature schema version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in the order defined by the group layout
    values: Vec<f32>,
}

impl FeatureVector {
    /// Wrap a freshly extracted value sequence under the current schema
    ///
    /// Only the extractor builds vectors infallibly; external value
    /// sequences go through [`FeatureVector::from_vec`].
    pub(crate) fn from_extracted(values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), FEATURE_COUNT);
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Adopt a precomputed value sequence (e.g. a stored dataset row)
    ///
    /// Fails when the width does not match the schema.
    pub fn from_vec(values: Vec<f32>) -> Result<Self, LayoutMismatchError> {
        if values.len() != FEATURE_COUNT {
            return Err(LayoutMismatchError {
                expected_version: FEATURE_VERSION,
                expected_hash: layout_hash(),
                actual_version: 0,
                actual_hash: 0,
            });
        }
        Ok(Self::from_extracted(values))
    }

    /// Get values as a slice
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Number of values (always [`FEATURE_COUNT`] for a valid vector)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Validate that this vector is compatible with the current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)?;
        if self.values.len() != FEATURE_COUNT {
            return Err(LayoutMismatchError {
                expected_version: FEATURE_VERSION,
                expected_hash: layout_hash(),
                actual_version: self.version,
                actual_hash: self.layout_hash,
            });
        }
        Ok(())
    }

    /// Check if this vector is compatible with the current layout
    pub fn is_compatible(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_enforces_width() {
        assert!(FeatureVector::from_vec(vec![0.0; FEATURE_COUNT]).is_ok());
        assert!(FeatureVector::from_vec(vec![0.0; 100]).is_err());
        assert!(FeatureVector::from_vec(Vec::new()).is_err());
    }

    #[test]
    fn test_fresh_vector_is_compatible() {
        let vector = FeatureVector::from_vec(vec![0.5; FEATURE_COUNT]).unwrap();
        assert!(vector.is_compatible());
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector.get(0), Some(0.5));
        assert_eq!(vector.get(FEATURE_COUNT), None);
    }

    #[test]
    fn test_stale_version_is_rejected() {
        let mut vector = FeatureVector::from_vec(vec![0.0; FEATURE_COUNT]).unwrap();
        vector.version = 1;
        assert!(vector.validate().is_err());
    }
}
