use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

use crate::intent_classifier::vocabulary::{LabelSet, Vocabulary};

/// Everything derived from the corpus before training.
///
/// Row `i` of `features` and row `i` of `outputs` describe the same pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingArtifacts {
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    /// Shape (number of patterns, vocabulary size)
    pub features: Array2<f32>,
    /// One-hot rows, shape (number of patterns, number of labels)
    pub outputs: Array2<f32>,
}

impl TrainingArtifacts {
    pub fn nb_examples(&self) -> usize {
        self.features.nrows()
    }
}
