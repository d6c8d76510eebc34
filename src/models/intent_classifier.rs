use serde::{Deserialize, Serialize};

/// Description of a persisted classifier, stored next to its weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralClassifierModel {
    pub model_version: String,
    pub nb_features: usize,
    pub nb_labels: usize,
}
