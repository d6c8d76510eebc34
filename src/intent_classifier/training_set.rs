use failure::ResultExt;
use log::info;
use ndarray::prelude::*;

use crate::errors::*;
use crate::intent_classifier::featurizer::encode_tokens;
use crate::intent_classifier::vocabulary::{tokenize_patterns, LabelSet, Vocabulary};
use crate::models::{Corpus, TrainingArtifacts};
use crate::preprocessing::normalize_stem;
use crate::resources::stemmer::Stemmer;

/// Builds the vocabulary, the label set and one training example per corpus
/// pattern.
///
/// Each pattern is encoded from its own token list rather than re-tokenized
/// from text.
pub fn build_training_artifacts(
    corpus: &Corpus,
    stemmer: &dyn Stemmer,
) -> Result<TrainingArtifacts> {
    info!("Building vocabulary and training set ...");
    let documents = tokenize_patterns(corpus);
    let vocabulary = Vocabulary::build(&documents, stemmer);
    let labels = LabelSet::from_corpus(corpus);

    let mut features = Array2::<f32>::zeros((documents.len(), vocabulary.len()));
    let mut outputs = Array2::<f32>::zeros((documents.len(), labels.len()));
    for (row, document) in documents.iter().enumerate() {
        let normalized_tokens = normalize_stem(&document.tokens, stemmer);
        features
            .row_mut(row)
            .assign(&encode_tokens(&normalized_tokens, &vocabulary));
        let label_index = labels
            .index_of(&document.intent)
            .ok_or_else(|| ChatbotError::UnknownIntent(document.intent.clone()))
            .with_context(|_| "Label set does not cover the corpus")?;
        outputs[[row, label_index]] = 1.;
    }

    info!(
        "Training set built ({} examples, {} tokens, {} labels)",
        documents.len(),
        vocabulary.len(),
        labels.len()
    );
    Ok(TrainingArtifacts {
        vocabulary,
        labels,
        features,
        outputs,
    })
}
