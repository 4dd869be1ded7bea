//! Arbitration Thresholds
//!
//! The two fixed confidence gates of the ensemble. Both gates are strict:
//! a prediction sitting exactly on a gate does not clear it.

use serde::{Deserialize, Serialize};

/// Confidence gates for ensemble arbitration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArbitrationThresholds {
    /// Soft-model gate: its prediction is adopted only when its top-class
    /// probability strictly exceeds this
    pub soft_gate: f32,

    /// Goodware gate: a clean label below or at this confidence is demoted
    /// to NeedsAttention. Malware is never gated.
    pub goodware_confidence_min: f32,
}

impl Default for ArbitrationThresholds {
    fn default() -> Self {
        Self {
            soft_gate: 0.75,
            goodware_confidence_min: 0.85,
        }
    }
}

impl ArbitrationThresholds {
    pub fn new(soft_gate: f32, goodware_confidence_min: f32) -> Self {
        Self {
            soft_gate,
            goodware_confidence_min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gates() {
        let thresholds = ArbitrationThresholds::default();
        assert_eq!(thresholds.soft_gate, 0.75);
        assert_eq!(thresholds.goodware_confidence_min, 0.85);
    }
}
