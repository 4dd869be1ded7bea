//! Model Module - Ensemble Inference Engine
//!
//! - `inference` - ONNX session loading + class-probability prediction
//! - `ensemble` - confidence-gated arbitration between the two models
//! - `threshold` - the fixed arbitration gates
//! - `types` - verdicts and classification results

pub mod ensemble;
pub mod inference;
pub mod threshold;
pub mod types;

// Re-export common types
pub use ensemble::{map_label, EnsembleClassifier, EnsembleStats};
pub use inference::{top_class, InferenceError, ModelLoadError, ModelMetadata, OnnxModel, ProbabilityModel};
pub use threshold::ArbitrationThresholds;
pub use types::{Classification, ModelRole, Verdict};
