use ndarray::prelude::*;

use crate::errors::*;
use crate::intent_classifier::IntentClassifier;
use crate::models::Corpus;

pub fn assert_epsilon_eq_array1(a: &Array1<f32>, b: &Array1<f32>, epsilon: f32) {
    assert_eq!(a.dim(), b.dim());
    for (index, elem_a) in a.indexed_iter() {
        assert!(epsilon_eq(*elem_a, b[index], epsilon))
    }
}

pub fn epsilon_eq(a: f32, b: f32, epsilon: f32) -> bool {
    let diff = a - b;
    diff < epsilon && diff > -epsilon
}

pub fn sample_corpus_json() -> &'static str {
    r#"{
        "intents": [
            {"tag": "greeting", "patterns": ["Hi", "Hello"], "responses": ["Hey!"]},
            {"tag": "goodbye", "patterns": ["Bye"], "responses": ["See you!"]}
        ]
    }"#
}

pub fn sample_corpus() -> Corpus {
    Corpus::from_reader(sample_corpus_json().as_bytes()).unwrap()
}

/// Returns the same distribution whatever the features.
pub struct MockedIntentClassifier {
    pub probabilities: Array1<f32>,
}

impl MockedIntentClassifier {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self {
            probabilities: Array1::from(probabilities),
        }
    }
}

impl IntentClassifier for MockedIntentClassifier {
    fn predict(&self, _features: &ArrayView1<f32>) -> Result<Array1<f32>> {
        Ok(self.probabilities.clone())
    }
}
