use std::io::{BufRead, Write};
use std::sync::Arc;

use failure::format_err;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::artifacts::ArtifactCache;
use crate::configurations::ChatbotConfiguration;
use crate::errors::*;
use crate::intent_classifier::{
    build_training_artifacts, Featurizer, IntentClassifier, LabelSet, NeuralIntentClassifier,
    Vocabulary,
};
use crate::models::{Corpus, TrainingArtifacts};
use crate::resources::loading::load_stemmer;
use crate::resources::stemmer::Stemmer;
use crate::utils::{argmax, IntentName};

pub const WELCOME_MESSAGE: &str = "Start talking with the bot (type quit to stop)!";
pub const PROMPT: &str = "You: ";
pub const QUIT_COMMAND: &str = "quit";

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub intent: IntentName,
    pub probability: f32,
    pub response: String,
}

pub struct Chatbot {
    corpus: Corpus,
    featurizer: Featurizer,
    labels: LabelSet,
    classifier: Box<dyn IntentClassifier>,
    rng: ChaCha8Rng,
}

impl Chatbot {
    /// Loads the corpus, then reuses the cached training data and the
    /// persisted classifier when present, building and training them
    /// otherwise.
    pub fn from_configuration(config: &ChatbotConfiguration) -> Result<Self> {
        config.validate()?;
        let corpus = Corpus::from_path(&config.corpus_path)?;
        let stemmer = load_stemmer(config.stem_overrides_path.as_ref())?;

        let cache = ArtifactCache::new(&config.artifacts_path);
        let artifacts = cache.load()?.or_build(|| {
            let artifacts = build_training_artifacts(&corpus, &*stemmer)?;
            cache.store(&artifacts)?;
            Ok(artifacts)
        })?;

        let classifier = NeuralIntentClassifier::from_path(&config.model_path)?.or_build(|| {
            let classifier = NeuralIntentClassifier::train(
                &artifacts,
                &config.training,
                &config.reproducibility,
            )?;
            classifier.persist(&config.model_path)?;
            Ok(classifier)
        })?;

        let TrainingArtifacts {
            vocabulary, labels, ..
        } = artifacts;
        info!("Chatbot ready");
        Ok(Self::new(
            corpus,
            vocabulary,
            labels,
            stemmer,
            Box::new(classifier),
            config.reproducibility.response_seed,
        ))
    }

    pub fn new(
        corpus: Corpus,
        vocabulary: Vocabulary,
        labels: LabelSet,
        stemmer: Arc<dyn Stemmer>,
        classifier: Box<dyn IntentClassifier>,
        response_seed: u64,
    ) -> Self {
        Self {
            corpus,
            featurizer: Featurizer::new(vocabulary, stemmer),
            labels,
            classifier,
            rng: ChaCha8Rng::seed_from_u64(response_seed),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.featurizer.vocabulary()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Classifies the input and picks one of the matched intent's responses
    /// uniformly at random. There is no confidence threshold.
    pub fn respond(&mut self, input: &str) -> Result<Reply> {
        let features = self.featurizer.transform(input);
        let probabilities = self.classifier.predict(&features.view())?;
        if probabilities.len() != self.labels.len() {
            return Err(ChatbotError::DimensionMismatch {
                expected: self.labels.len(),
                found: probabilities.len(),
            }
            .into());
        }
        let best_index = argmax(&probabilities.view())
            .ok_or_else(|| format_err!("Classifier returned no probabilities"))?;
        let intent = self
            .labels
            .get(best_index)
            .ok_or_else(|| ChatbotError::InternalError(format!("No label at {}", best_index)))?
            .clone();
        let probability = probabilities[best_index];
        debug!("Input {:?} classified as '{}' ({:.4})", input, intent, probability);

        let response = self
            .corpus
            .responses(&intent)?
            .choose(&mut self.rng)
            .ok_or_else(|| ChatbotError::MissingResponses(intent.clone()))?
            .clone();
        Ok(Reply {
            intent,
            probability,
            response,
        })
    }

    /// Line-oriented conversation, ended by the quit command or by the end
    /// of the input.
    pub fn chat<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", WELCOME_MESSAGE)?;
        let mut lines = reader.lines();
        loop {
            write!(writer, "{}", PROMPT)?;
            writer.flush()?;
            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    debug!("End of input reached");
                    break;
                }
            };
            if is_quit_command(&line) {
                break;
            }
            let reply = self.respond(&line)?;
            writeln!(writer, "{}", reply.response)?;
        }
        Ok(())
    }
}

pub fn is_quit_command(line: &str) -> bool {
    line.to_lowercase() == QUIT_COMMAND
}
