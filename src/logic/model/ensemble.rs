//! Ensemble Classifier - Confidence-Gated Arbitration
//!
//! Holds the two pretrained models and arbitrates between them: the soft
//! model's prediction is adopted only when its top-class probability clears
//! the gate; otherwise the hard model's own best guess stands, with no
//! second gate. The adopted label then maps to a verdict where a clean
//! label additionally needs high confidence but a malicious label always
//! wins.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;

use super::inference::{top_class, InferenceError, ModelLoadError, ModelMetadata, OnnxModel, ProbabilityModel};
use super::threshold::ArbitrationThresholds;
use super::types::{Classification, ModelRole, Verdict};

// ============================================================================
// LABEL MAPPING
// ============================================================================

/// Map an adopted numeric label and confidence to a verdict
///
/// Label 0 needs confidence strictly above the goodware gate; label 1 is
/// malware at any confidence; everything else needs attention.
pub fn map_label(label: usize, confidence: f32, thresholds: &ArbitrationThresholds) -> Verdict {
    if label == 0 && confidence > thresholds.goodware_confidence_min {
        Verdict::Goodware
    } else if label == 1 {
        Verdict::Malware
    } else {
        Verdict::NeedsAttention
    }
}

// ============================================================================
// ENSEMBLE
// ============================================================================

/// Inference statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleStats {
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

/// The two-model ensemble
///
/// Loaded once at startup; `classify` is safe to call concurrently - the
/// models are read-only and each session carries its own lock.
pub struct EnsembleClassifier {
    soft: Box<dyn ProbabilityModel + Send + Sync>,
    hard: Box<dyn ProbabilityModel + Send + Sync>,
    thresholds: ArbitrationThresholds,
    inference_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl EnsembleClassifier {
    /// Load both model artifacts
    pub fn load(
        soft_path: &Path,
        hard_path: &Path,
        thresholds: ArbitrationThresholds,
    ) -> Result<Self, ModelLoadError> {
        let soft = OnnxModel::load(ModelRole::Soft, soft_path)?;
        let hard = OnnxModel::load(ModelRole::Hard, hard_path)?;
        Ok(Self::from_models(Box::new(soft), Box::new(hard), thresholds))
    }

    /// Assemble from already-constructed models
    pub fn from_models(
        soft: Box<dyn ProbabilityModel + Send + Sync>,
        hard: Box<dyn ProbabilityModel + Send + Sync>,
        thresholds: ArbitrationThresholds,
    ) -> Self {
        Self {
            soft,
            hard,
            thresholds,
            inference_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    /// Classify a feature vector
    pub fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        features.validate()?;

        let start = std::time::Instant::now();

        let soft_probs = self.soft.class_probabilities(features)?;
        let (soft_label, soft_confidence) = top_class(&soft_probs)
            .ok_or(InferenceError::NoProbabilities { role: ModelRole::Soft })?;

        let (label, confidence, decided_by) = if soft_confidence > self.thresholds.soft_gate {
            (soft_label, soft_confidence, ModelRole::Soft)
        } else {
            let hard_probs = self.hard.class_probabilities(features)?;
            let (hard_label, hard_confidence) = top_class(&hard_probs)
                .ok_or(InferenceError::NoProbabilities { role: ModelRole::Hard })?;
            (hard_label, hard_confidence, ModelRole::Hard)
        };

        let verdict = map_label(label, confidence, &self.thresholds);

        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        log::debug!(
            "Classified as {} (confidence {:.4}, decided by {})",
            verdict,
            confidence,
            decided_by
        );

        Ok(Classification {
            verdict,
            confidence,
            decided_by,
        })
    }

    /// Metadata of both loaded models
    pub fn model_metadata(&self) -> (ModelMetadata, ModelMetadata) {
        (self.soft.metadata(), self.hard.metadata())
    }

    /// Inference statistics
    pub fn stats(&self) -> EnsembleStats {
        let count = self.inference_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        EnsembleStats {
            inference_count: count,
            avg_latency_ms: if count > 0 {
                (sum as f32 / count as f32) / 1000.0
            } else {
                0.0
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
