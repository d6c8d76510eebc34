use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use failure::ResultExt;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::utils::IntentName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub tag: IntentName,
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

/// Static collection of intents, validated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub intents: Vec<Intent>,
}

impl Corpus {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let corpus_path = path.as_ref();
        info!("Loading corpus ({:?}) ...", corpus_path);
        let corpus_file = File::open(corpus_path)
            .with_context(|_| format!("Cannot open corpus file {:?}", corpus_path))?;
        let corpus = Self::from_reader(corpus_file)
            .with_context(|_| format!("Invalid corpus file {:?}", corpus_path))?;
        info!("Corpus loaded ({} intents)", corpus.intents.len());
        Ok(corpus)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let corpus: Corpus = serde_json::from_reader(reader)
            .with_context(|_| "Cannot deserialize corpus json data")?;
        corpus.validate()?;
        Ok(corpus)
    }

    pub fn new(intents: Vec<Intent>) -> Result<Self> {
        let corpus = Self { intents };
        corpus.validate()?;
        Ok(corpus)
    }

    fn validate(&self) -> Result<()> {
        if self.intents.is_empty() {
            return Err(
                ChatbotError::InvalidCorpus("corpus contains no intents".to_string()).into(),
            );
        }
        let mut seen_tags = HashSet::new();
        for intent in &self.intents {
            if !seen_tags.insert(&intent.tag) {
                return Err(ChatbotError::DuplicateIntent(intent.tag.clone()).into());
            }
            if intent.responses.is_empty() {
                return Err(ChatbotError::MissingResponses(intent.tag.clone()).into());
            }
        }
        Ok(())
    }

    pub fn responses(&self, tag: &str) -> Result<&[String]> {
        self.intents
            .iter()
            .find(|intent| intent.tag == tag)
            .map(|intent| &intent.responses[..])
            .ok_or_else(|| ChatbotError::UnknownIntent(tag.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::sample_corpus_json;

    #[test]
    fn from_reader_works() {
        // When
        let corpus = Corpus::from_reader(sample_corpus_json().as_bytes()).unwrap();

        // Then
        let expected_corpus = Corpus {
            intents: vec![
                Intent {
                    tag: "greeting".to_string(),
                    patterns: vec!["Hi".to_string(), "Hello".to_string()],
                    responses: vec!["Hey!".to_string()],
                },
                Intent {
                    tag: "goodbye".to_string(),
                    patterns: vec!["Bye".to_string()],
                    responses: vec!["See you!".to_string()],
                },
            ],
        };
        assert_eq!(expected_corpus, corpus);
    }

    #[test]
    fn from_reader_ignores_extra_keys() {
        // Given
        let data = r#"{"intents": [
            {"tag": "thanks", "patterns": ["Thanks"], "responses": ["Any time"], "context_set": ""}
        ]}"#;

        // When
        let corpus = Corpus::from_reader(data.as_bytes());

        // Then
        assert!(corpus.is_ok());
    }

    #[test]
    fn from_reader_fails_on_missing_key() {
        // Given
        let data = r#"{"intents": [{"tag": "greeting", "responses": ["Hey!"]}]}"#;

        // When
        let result = Corpus::from_reader(data.as_bytes());

        // Then
        assert!(result.is_err());
        let message = format!("{}", result.unwrap_err());
        assert_eq!("Cannot deserialize corpus json data", message);
    }

    #[test]
    fn from_reader_fails_on_duplicate_tags() {
        // Given
        let data = r#"{"intents": [
            {"tag": "greeting", "patterns": ["Hi"], "responses": ["Hey!"]},
            {"tag": "greeting", "patterns": ["Hello"], "responses": ["Hello!"]}
        ]}"#;

        // When
        let result = Corpus::from_reader(data.as_bytes());

        // Then
        let error = result.unwrap_err();
        match error.downcast_ref::<ChatbotError>() {
            Some(ChatbotError::DuplicateIntent(tag)) => assert_eq!("greeting", tag),
            _ => panic!("unexpected error: {}", error),
        }
    }

    #[test]
    fn from_reader_fails_on_intent_without_responses() {
        // Given
        let data = r#"{"intents": [{"tag": "greeting", "patterns": ["Hi"], "responses": []}]}"#;

        // When
        let result = Corpus::from_reader(data.as_bytes());

        // Then
        let error = result.unwrap_err();
        match error.downcast_ref::<ChatbotError>() {
            Some(ChatbotError::MissingResponses(tag)) => assert_eq!("greeting", tag),
            _ => panic!("unexpected error: {}", error),
        }
    }

    #[test]
    fn from_reader_fails_on_empty_corpus() {
        let result = Corpus::from_reader(r#"{"intents": []}"#.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn from_path_fails_on_missing_file() {
        let result = Corpus::from_path("does/not/exist.json");
        assert!(result.is_err());
    }

    #[test]
    fn responses_fails_loudly_on_unknown_tag() {
        // Given
        let corpus = Corpus::from_reader(sample_corpus_json().as_bytes()).unwrap();

        // When
        let responses = corpus.responses("weather");

        // Then
        assert!(responses.is_err());
        assert_eq!(
            vec!["Hey!".to_string()],
            corpus.responses("greeting").unwrap().to_vec()
        );
    }
}
