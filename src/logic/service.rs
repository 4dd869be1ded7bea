//! Classifier Service - Dependency-Injected Facade
//!
//! One `ClassifierService` is constructed at process start, owning the two
//! loaded models and the family hash database, and is passed by reference to
//! every request handler. Construction fails fast: a service never starts
//! half-initialized.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

use super::attributes::{extract_attributes, AttributeReport};
use super::family::{FamilyAttributor, FamilyMatch, LookupError};
use super::features::{extract_features, ExtractionError, FeatureVector};
use super::model::{
    ArbitrationThresholds, Classification, EnsembleClassifier, InferenceError, ModelLoadError,
    ModelMetadata,
};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Artifact locations and thresholds for one service instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub soft_model_path: PathBuf,
    pub hard_model_path: PathBuf,
    pub family_db_path: PathBuf,
    pub thresholds: ArbitrationThresholds,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            soft_model_path: constants::get_soft_model_path(),
            hard_model_path: constants::get_hard_model_path(),
            family_db_path: constants::get_family_db_path(),
            thresholds: ArbitrationThresholds::default(),
        }
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Startup-fatal initialization failure
#[derive(Debug)]
pub enum StartupError {
    Model(ModelLoadError),
    FamilyDb(LookupError),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Model(e) => write!(f, "Startup failed: {}", e),
            StartupError::FamilyDb(e) => write!(f, "Startup failed: {}", e),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<ModelLoadError> for StartupError {
    fn from(err: ModelLoadError) -> Self {
        StartupError::Model(err)
    }
}

impl From<LookupError> for StartupError {
    fn from(err: LookupError) -> Self {
        StartupError::FamilyDb(err)
    }
}

/// Per-request analysis failure
#[derive(Debug)]
pub enum AnalysisError {
    Extraction(ExtractionError),
    Inference(InferenceError),
    Family(LookupError),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Extraction(e) => write!(f, "Could not analyze file: {}", e),
            AnalysisError::Inference(e) => write!(f, "Could not analyze file: {}", e),
            AnalysisError::Family(e) => write!(f, "Could not analyze file: {}", e),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<ExtractionError> for AnalysisError {
    fn from(err: ExtractionError) -> Self {
        AnalysisError::Extraction(err)
    }
}

impl From<InferenceError> for AnalysisError {
    fn from(err: InferenceError) -> Self {
        AnalysisError::Inference(err)
    }
}

impl From<LookupError> for AnalysisError {
    fn from(err: LookupError) -> Self {
        AnalysisError::Family(err)
    }
}

// ============================================================================
// REPORTS
// ============================================================================

/// Full single-sample analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sha256: String,
    pub classification: Classification,
    pub attributes: AttributeReport,
    /// Populated only for a malware verdict
    pub family: Option<Vec<FamilyMatch>>,
}

/// Engine status snapshot for dashboards and health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub soft_model: ModelMetadata,
    pub hard_model: ModelMetadata,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
    pub family_count: usize,
}

// ============================================================================
// SERVICE
// ============================================================================

/// The classification core, loaded once and shared by all requests
pub struct ClassifierService {
    ensemble: EnsembleClassifier,
    attributor: FamilyAttributor,
}

impl ClassifierService {
    /// Load all artifacts per the configuration
    pub fn init(config: &ServiceConfig) -> Result<Self, StartupError> {
        log::info!(
            "Starting {} v{}",
            constants::APP_NAME,
            constants::APP_VERSION
        );

        let ensemble = EnsembleClassifier::load(
            &config.soft_model_path,
            &config.hard_model_path,
            config.thresholds,
        )?;
        let attributor = FamilyAttributor::load(&config.family_db_path)?;

        Ok(Self {
            ensemble,
            attributor,
        })
    }

    /// Assemble from already-loaded engines
    pub fn from_parts(ensemble: EnsembleClassifier, attributor: FamilyAttributor) -> Self {
        Self {
            ensemble,
            attributor,
        }
    }

    /// Extract the feature vector from raw PE bytes
    pub fn extract_features(&self, data: &[u8]) -> Result<FeatureVector, ExtractionError> {
        extract_features(data)
    }

    /// Extract structural attributes, best effort
    pub fn extract_attributes(&self, data: &[u8]) -> AttributeReport {
        extract_attributes(data)
    }

    /// Classify an extracted feature vector
    pub fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        self.ensemble.classify(features)
    }

    /// Attribute a malware family from raw bytes
    pub fn attribute_family(&self, data: &[u8]) -> Result<Vec<FamilyMatch>, LookupError> {
        self.attributor.attribute_bytes(data)
    }

    /// Attribute a malware family from a precomputed SHA-256 hex digest
    pub fn attribute_family_digest(&self, digest: &str) -> Result<Vec<FamilyMatch>, LookupError> {
        self.attributor.attribute_digest(digest)
    }

    /// Run the full pipeline on one sample
    ///
    /// Features -> classification -> attribute sidecar; family attribution
    /// runs only on a malware verdict.
    pub fn analyze(&self, data: &[u8]) -> Result<AnalysisReport, AnalysisError> {
        let sha256 = super::family::sha256_hex(data);
        log::info!("Analyzing sample {} ({} bytes)", &sha256[..12], data.len());

        let features = extract_features(data)?;
        let classification = self.ensemble.classify(&features)?;
        let attributes = extract_attributes(data);

        let family = if classification.verdict.is_malware() {
            Some(self.attributor.attribute_digest(&sha256)?)
        } else {
            None
        };

        log::info!(
            "Sample {}: {} (confidence {:.4})",
            &sha256[..12],
            classification.verdict,
            classification.confidence
        );

        Ok(AnalysisReport {
            sha256,
            classification,
            attributes,
            family,
        })
    }

    /// Engine status snapshot
    pub fn status(&self) -> EngineStatus {
        let (soft_model, hard_model) = self.ensemble.model_metadata();
        let stats = self.ensemble.stats();
        EngineStatus {
            soft_model,
            hard_model,
            inference_count: stats.inference_count,
            avg_latency_ms: stats.avg_latency_ms,
            family_count: self.attributor.family_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::family::FamilyHashDatabase;
    use crate::logic::model::{ModelRole, ProbabilityModel, Verdict};
    use crate::logic::testutil::minimal_pe;
    use crate::logic::features::FEATURE_COUNT;

    struct FixedModel {
        role: ModelRole,
        probabilities: Vec<f32>,
    }

    impl ProbabilityModel for FixedModel {
        fn class_probabilities(
            &self,
            _features: &FeatureVector,
        ) -> Result<Vec<f32>, InferenceError> {
            Ok(self.probabilities.clone())
        }

        fn metadata(&self) -> ModelMetadata {
            ModelMetadata {
                role: self.role,
                model_path: "<fixed>".to_string(),
                features: FEATURE_COUNT,
                loaded_at: chrono::Utc::now(),
            }
        }
    }

    fn service(soft: Vec<f32>, hard: Vec<f32>) -> ClassifierService {
        let ensemble = EnsembleClassifier::from_models(
            Box::new(FixedModel {
                role: ModelRole::Soft,
                probabilities: soft,
            }),
            Box::new(FixedModel {
                role: ModelRole::Hard,
                probabilities: hard,
            }),
            ArbitrationThresholds::default(),
        );
        let db = FamilyHashDatabase::from_records([
            (
                "emotet",
                "0000000000000000000000000000000000000000000000000000000000000000",
            ),
            (
                "qakbot",
                "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            ),
        ])
        .unwrap();
        ClassifierService::from_parts(ensemble, FamilyAttributor::new(db))
    }

    #[test]
    fn test_analyze_malware_attributes_a_family() {
        let service = service(vec![0.05, 0.95], vec![0.5, 0.5]);
        let report = service.analyze(&minimal_pe()).unwrap();

        assert_eq!(report.classification.verdict, Verdict::Malware);
        assert_eq!(report.sha256.len(), 64);
        let family = report.family.expect("malware carries family matches");
        assert!(!family.is_empty());
        assert!(!report.attributes.is_partial());
    }

    #[test]
    fn test_analyze_goodware_skips_family_attribution() {
        let service = service(vec![0.95, 0.05], vec![0.5, 0.5]);
        let report = service.analyze(&minimal_pe()).unwrap();

        assert_eq!(report.classification.verdict, Verdict::Goodware);
        assert!(report.family.is_none());
    }

    #[test]
    fn test_analyze_unparseable_input_fails_structurally() {
        let service = service(vec![0.05, 0.95], vec![0.5, 0.5]);
        let result = service.analyze(b"definitely not a pe");
        assert!(matches!(result, Err(AnalysisError::Extraction(_))));
    }

    #[test]
    fn test_status_reports_both_models_and_families() {
        let service = service(vec![0.05, 0.95], vec![0.5, 0.5]);
        let status = service.status();
        assert_eq!(status.family_count, 2);
        assert_eq!(status.inference_count, 0);
        assert_eq!(status.soft_model.role, ModelRole::Soft);
        assert_eq!(status.hard_model.role, ModelRole::Hard);
    }

    #[test]
    fn test_init_fails_fast_on_missing_artifacts() {
        let config = ServiceConfig {
            soft_model_path: PathBuf::from("/nonexistent/soft.onnx"),
            hard_model_path: PathBuf::from("/nonexistent/hard.onnx"),
            family_db_path: PathBuf::from("/nonexistent/family.json"),
            thresholds: ArbitrationThresholds::default(),
        };
        assert!(matches!(
            ClassifierService::init(&config),
            Err(StartupError::Model(_))
        ));
    }
}
