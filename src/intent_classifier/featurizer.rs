use std::sync::Arc;

use ndarray::prelude::*;

use crate::intent_classifier::vocabulary::Vocabulary;
use crate::preprocessing::{normalize_stem, tokenize};
use crate::resources::stemmer::Stemmer;
use crate::utils::Token;

/// Encodes utterances as binary bag-of-words vectors over a fixed vocabulary.
pub struct Featurizer {
    vocabulary: Vocabulary,
    stemmer: Arc<dyn Stemmer>,
}

impl Featurizer {
    pub fn new(vocabulary: Vocabulary, stemmer: Arc<dyn Stemmer>) -> Self {
        Self {
            vocabulary,
            stemmer,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn transform(&self, input: &str) -> Array1<f32> {
        encode(input, &self.vocabulary, &*self.stemmer)
    }
}

/// Encodes a raw utterance.
///
/// Tokens go through the same normalization and stemming as the vocabulary,
/// position `i` is 1 iff the `i`-th vocabulary token occurs in the utterance.
pub fn encode(input: &str, vocabulary: &Vocabulary, stemmer: &dyn Stemmer) -> Array1<f32> {
    let tokens = tokenize(input);
    encode_tokens(&normalize_stem(&tokens, stemmer), vocabulary)
}

/// Encodes tokens which are already normalized and stemmed.
pub fn encode_tokens(normalized_tokens: &[Token], vocabulary: &Vocabulary) -> Array1<f32> {
    let mut features = Array1::zeros(vocabulary.len());
    for token in normalized_tokens {
        if let Some(index) = vocabulary.index_of(token) {
            features[index] = 1.;
        }
    }
    features
}
