//! Inference Engine - ONNX Runtime Integration
//!
//! Loads a pretrained classifier artifact and exposes its class-probability
//! prediction. Each session sits behind its own mutex: `ort` inference needs
//! exclusive session access, and locking per model rather than per request
//! keeps the two ensemble members independently available.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, LayoutMismatchError, FEATURE_COUNT};

use super::types::ModelRole;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Startup-fatal: a model artifact is missing or corrupt
#[derive(Debug)]
pub enum ModelLoadError {
    NotFound { role: ModelRole, path: PathBuf },
    Session { role: ModelRole, message: String },
}

impl std::fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoadError::NotFound { role, path } => {
                write!(f, "{} model not found: {}", role, path.display())
            }
            ModelLoadError::Session { role, message } => {
                write!(f, "{} model failed to load: {}", role, message)
            }
        }
    }
}

impl std::error::Error for ModelLoadError {}

/// Per-request: a loaded model rejected a well-formed vector
#[derive(Debug)]
pub enum InferenceError {
    /// The vector was produced under an incompatible schema
    Layout(LayoutMismatchError),
    /// The model run itself failed
    Session { role: ModelRole, message: String },
    /// The model returned no usable probability output
    NoProbabilities { role: ModelRole },
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::Layout(e) => write!(f, "InferenceError: {}", e),
            InferenceError::Session { role, message } => {
                write!(f, "InferenceError: {} model run failed: {}", role, message)
            }
            InferenceError::NoProbabilities { role } => {
                write!(f, "InferenceError: {} model produced no probability output", role)
            }
        }
    }
}

impl std::error::Error for InferenceError {}

impl From<LayoutMismatchError> for InferenceError {
    fn from(err: LayoutMismatchError) -> Self {
        InferenceError::Layout(err)
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub role: ModelRole,
    pub model_path: String,
    pub features: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// PROBABILITY MODEL TRAIT
// ============================================================================

/// A pretrained classifier exposing class-probability prediction
pub trait ProbabilityModel {
    fn class_probabilities(&self, features: &FeatureVector) -> Result<Vec<f32>, InferenceError>;
    fn metadata(&self) -> ModelMetadata;
}

/// Index and value of the highest class probability
///
/// Ties resolve to the first index, matching the argmax the models were
/// calibrated with.
pub fn top_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &p) in probabilities.iter().enumerate() {
        match best {
            Some((_, current)) if p <= current => {}
            _ => best = Some((index, p)),
        }
    }
    best
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// One loaded ONNX classifier
pub struct OnnxModel {
    role: ModelRole,
    metadata: ModelMetadata,
    session: Mutex<Session>,
}

impl OnnxModel {
    /// Load a model artifact from disk
    pub fn load(role: ModelRole, path: &Path) -> Result<Self, ModelLoadError> {
        log::info!("Loading {} model from: {}", role, path.display());

        if !path.exists() {
            return Err(ModelLoadError::NotFound {
                role,
                path: path.to_path_buf(),
            });
        }

        let session = Session::builder()
            .map_err(|e| ModelLoadError::Session {
                role,
                message: format!("Failed to create session builder: {}", e),
            })?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelLoadError::Session {
                role,
                message: format!("Failed to set optimization: {}", e),
            })?
            .commit_from_file(path)
            .map_err(|e| ModelLoadError::Session {
                role,
                message: format!("Failed to load model: {}", e),
            })?;

        log::info!("{} model loaded successfully", role);

        Ok(Self {
            role,
            metadata: ModelMetadata {
                role,
                model_path: path.display().to_string(),
                features: FEATURE_COUNT,
                loaded_at: chrono::Utc::now(),
            },
            session: Mutex::new(session),
        })
    }
}

impl ProbabilityModel for OnnxModel {
    fn class_probabilities(&self, features: &FeatureVector) -> Result<Vec<f32>, InferenceError> {
        let role = self.role;

        let input_array = Array2::<f32>::from_shape_vec(
            (1, FEATURE_COUNT),
            features.as_slice().to_vec(),
        )
        .map_err(|e| InferenceError::Session {
            role,
            message: format!("Array error: {}", e),
        })?;

        let input_tensor = Value::from_array(input_array).map_err(|e| InferenceError::Session {
            role,
            message: format!("Tensor error: {}", e),
        })?;

        let mut session = self.session.lock();

        let output_names: Vec<String> = session.outputs().iter().map(|o| o.name().to_string()).collect();

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Session {
                role,
                message: format!("Inference failed: {}", e),
            })?;

        // Tree-classifier exports emit (label, probabilities); the label
        // tensor is int64, so the first f32-extractable output is the
        // probability row.
        for name in &output_names {
            if let Some(value) = outputs.get(name.as_str()) {
                if let Ok(tensor) = value.try_extract_tensor::<f32>() {
                    let data = tensor.1;
                    if !data.is_empty() {
                        return Ok(data.to_vec());
                    }
                }
            }
        }

        Err(InferenceError::NoProbabilities { role })
    }

    fn metadata(&self) -> ModelMetadata {
        self.metadata.clone()
    }
}
