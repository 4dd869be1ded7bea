//! Logic Module - Analysis Engines
//!
//! Contains the engines of the classification pipeline:
//! - `features/` - Static feature vector extraction (schema v2, 2381 dims)
//! - `attributes/` - Structural attribute sidecar (diagnostic only)
//! - `model/` - ONNX inference + confidence-gated ensemble arbitration
//! - `family/` - Family hash database + Hamming-distance attribution
//! - `service` - Dependency-injected facade holding the loaded artifacts

pub mod attributes;
pub mod family;
pub mod features;
pub mod model;
pub mod service;

#[cfg(test)]
pub mod testutil;
