pub mod featurizer;
pub mod network;
mod neural_intent_classifier;
mod training_set;
pub mod vocabulary;

use ndarray::prelude::*;

use crate::errors::*;

pub use self::featurizer::{encode, Featurizer};
pub use self::network::{HIDDEN_LINEAR_UNITS, HIDDEN_RELU_UNITS};
pub use self::neural_intent_classifier::NeuralIntentClassifier;
pub use self::training_set::build_training_artifacts;
pub use self::vocabulary::{LabelSet, Vocabulary};

pub trait IntentClassifier: Send + Sync {
    /// Probability of each label, in label set order.
    fn predict(&self, features: &ArrayView1<f32>) -> Result<Array1<f32>>;
}
