pub mod artifacts;
pub mod chatbot;
pub mod configurations;
pub mod errors;
pub mod intent_classifier;
pub mod models;
pub mod preprocessing;
pub mod resources;
#[cfg(test)]
mod testutils;
mod utils;

pub const MODEL_VERSION: &str = "0.1.0";

pub use crate::artifacts::{ArtifactCache, CacheLookup};
pub use crate::chatbot::{Chatbot, Reply};
pub use crate::configurations::{
    ChatbotConfiguration, ReproducibilityConfiguration, TrainingConfiguration,
};
pub use crate::errors::*;
pub use crate::intent_classifier::{
    Featurizer, IntentClassifier, LabelSet, NeuralIntentClassifier, Vocabulary,
};
pub use crate::models::*;
pub use crate::resources::stemmer::{LancasterStemmer, StemOverrides, Stemmer};
pub use crate::utils::{IntentName, Token};
