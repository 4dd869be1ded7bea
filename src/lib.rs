//! Static PE Malware Classification Core
//!
//! Classifies Windows PE binaries as goodware, malware or "needs attention",
//! and attributes a malware family by Hamming distance against a database of
//! representative hashes.
//!
//! The pipeline: raw bytes -> 2381-dim feature vector (schema v2) -> ensemble
//! of two pretrained ONNX models -> verdict; on a malware verdict the sample's
//! SHA-256 is matched against the family hash database. A structural attribute
//! sidecar reports shallow container statistics alongside.
//!
//! Web routing, persistence and upload handling are external collaborators;
//! they construct one [`ClassifierService`] at startup and call into it per
//! request.

pub mod constants;
pub mod logic;

pub use logic::attributes::{extract_attributes, AttributeReport, AttributeValue};
pub use logic::family::{FamilyAttributor, FamilyHashDatabase, FamilyMatch, LookupError};
pub use logic::features::{
    extract_features, ExtractionError, FeatureVector, FEATURE_COUNT, FEATURE_VERSION,
};
pub use logic::model::{
    ArbitrationThresholds, Classification, EnsembleClassifier, InferenceError, ModelLoadError,
    ModelRole, Verdict,
};
pub use logic::service::{
    AnalysisError, AnalysisReport, ClassifierService, EngineStatus, ServiceConfig, StartupError,
};
