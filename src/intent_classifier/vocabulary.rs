use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::models::Corpus;
use crate::preprocessing::{normalize_stem, tokenize};
use crate::resources::stemmer::Stemmer;
use crate::utils::{IntentName, Token};

/// Raw token excluded from the vocabulary.
pub const IGNORED_TOKEN: &str = "?";

/// Tokenized corpus pattern together with the intent it illustrates.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDocument {
    pub tokens: Vec<Token>,
    pub intent: IntentName,
}

pub fn tokenize_patterns(corpus: &Corpus) -> Vec<PatternDocument> {
    corpus
        .intents
        .iter()
        .flat_map(|intent| {
            intent.patterns.iter().map(move |pattern| PatternDocument {
                tokens: tokenize(pattern),
                intent: intent.tag.clone(),
            })
        })
        .collect()
}

/// Sorted, deduplicated set of normalized and stemmed tokens.
///
/// Feature vector positions follow the lexicographic order of the tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    tokens: Vec<Token>,
}

impl Vocabulary {
    pub fn build(documents: &[PatternDocument], stemmer: &dyn Stemmer) -> Self {
        let raw_tokens = documents
            .iter()
            .flat_map(|document| document.tokens.iter())
            .filter(|token| token.as_str() != IGNORED_TOKEN)
            .cloned()
            .collect_vec();
        Self::from_tokens(normalize_stem(&raw_tokens, stemmer))
    }

    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        Self {
            tokens: tokens.into_iter().sorted().dedup().collect(),
        }
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens
            .binary_search_by(|probe| probe.as_str().cmp(token))
            .ok()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Sorted list of distinct intent tags, position `i` matching output `i` of
/// the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<IntentName>,
}

impl LabelSet {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self::from_labels(corpus.intents.iter().map(|intent| intent.tag.clone()))
    }

    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = IntentName>,
    {
        Self {
            labels: labels.into_iter().sorted().dedup().collect(),
        }
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    pub fn get(&self, index: usize) -> Option<&IntentName> {
        self.labels.get(index)
    }

    pub fn labels(&self) -> &[IntentName] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;
    use crate::resources::stemmer::LancasterStemmer;
    use crate::testutils::sample_corpus;

    #[test]
    fn vocabulary_build_works() {
        // Given
        let documents = tokenize_patterns(&sample_corpus());

        // When
        let vocabulary = Vocabulary::build(&documents, &LancasterStemmer);

        // Then
        assert_eq!(&["bye", "hello", "hi"], vocabulary.tokens());
    }

    #[test]
    fn vocabulary_build_drops_question_marks_and_duplicates() {
        // Given
        let corpus = Corpus::new(vec![Intent {
            tag: "age".to_string(),
            patterns: vec![
                "How old are you?".to_string(),
                "how OLD?".to_string(),
                "Are you running, running?".to_string(),
            ],
            responses: vec!["Old enough".to_string()],
        }])
        .unwrap();
        let documents = tokenize_patterns(&corpus);

        // When
        let vocabulary = Vocabulary::build(&documents, &LancasterStemmer);

        // Then
        assert_eq!(&[",", "ar", "how", "old", "run", "you"], vocabulary.tokens());
        assert_eq!(None, vocabulary.index_of("?"));
    }

    #[test]
    fn vocabulary_build_is_independent_of_corpus_order() {
        // Given
        let corpus = sample_corpus();
        let mut reversed_corpus = corpus.clone();
        reversed_corpus.intents.reverse();

        // When
        let vocabulary = Vocabulary::build(&tokenize_patterns(&corpus), &LancasterStemmer);
        let reversed_vocabulary =
            Vocabulary::build(&tokenize_patterns(&reversed_corpus), &LancasterStemmer);

        // Then
        assert_eq!(vocabulary, reversed_vocabulary);
        assert_eq!(
            LabelSet::from_corpus(&corpus),
            LabelSet::from_corpus(&reversed_corpus)
        );
    }

    #[test]
    fn label_set_is_sorted() {
        // When
        let labels = LabelSet::from_corpus(&sample_corpus());

        // Then
        assert_eq!(&["goodbye".to_string(), "greeting".to_string()], labels.labels());
        assert_eq!(Some(1), labels.index_of("greeting"));
        assert_eq!(Some(&"goodbye".to_string()), labels.get(0));
        assert_eq!(None, labels.get(2));
    }

    #[test]
    fn tokenize_patterns_keeps_intent_alignment() {
        // When
        let documents = tokenize_patterns(&sample_corpus());

        // Then
        let expected_documents = vec![
            PatternDocument {
                tokens: vec!["Hi".to_string()],
                intent: "greeting".to_string(),
            },
            PatternDocument {
                tokens: vec!["Hello".to_string()],
                intent: "greeting".to_string(),
            },
            PatternDocument {
                tokens: vec!["Bye".to_string()],
                intent: "goodbye".to_string(),
            },
        ];
        assert_eq!(expected_documents, documents);
    }
}
