use std::fs::File;
use std::path::{Path, PathBuf};

use failure::ResultExt;
use serde::{Deserialize, Serialize};

use crate::errors::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotConfiguration {
    pub corpus_path: PathBuf,
    pub artifacts_path: PathBuf,
    pub model_path: PathBuf,
    /// `word,stem` table consulted before the Lancaster rules
    pub stem_overrides_path: Option<PathBuf>,
    pub training: TrainingConfiguration,
    pub reproducibility: ReproducibilityConfiguration,
}

impl Default for ChatbotConfiguration {
    fn default() -> Self {
        Self {
            corpus_path: Path::new("data").join("intents.json"),
            artifacts_path: Path::new("data").join("training_data.bin"),
            model_path: Path::new("data").join("model"),
            stem_overrides_path: None,
            training: TrainingConfiguration::default(),
            reproducibility: ReproducibilityConfiguration::default(),
        }
    }
}

impl ChatbotConfiguration {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        let config_file = File::open(config_path)
            .with_context(|_| format!("Cannot open configuration file {:?}", config_path))?;
        let config: ChatbotConfiguration = serde_json::from_reader(config_file)
            .with_context(|_| format!("Invalid configuration file {:?}", config_path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;
        self.reproducibility.validate()
    }
}

/// Fixed-budget training parameters. The network topology itself is not
/// configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfiguration {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
}

impl Default for TrainingConfiguration {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 8,
            learning_rate: 0.001,
        }
    }
}

impl TrainingConfiguration {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(invalid("epochs must be strictly positive"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size must be strictly positive"));
        }
        if !(self.learning_rate > 0.) {
            return Err(invalid("learning_rate must be strictly positive"));
        }
        Ok(())
    }
}

/// Seeds of the three random sources, and the number of threads training may
/// use. Identical values give identical models on every machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproducibilityConfiguration {
    /// Response selection
    pub response_seed: u64,
    /// Per-epoch shuffling of the training set
    pub shuffle_seed: u64,
    /// Weight initialization
    pub training_seed: u64,
    pub training_threads: usize,
}

impl Default for ReproducibilityConfiguration {
    fn default() -> Self {
        Self {
            response_seed: 12345,
            shuffle_seed: 42,
            training_seed: 1234,
            training_threads: 1,
        }
    }
}

impl ReproducibilityConfiguration {
    pub fn validate(&self) -> Result<()> {
        if self.training_threads == 0 {
            return Err(invalid("training_threads must be strictly positive"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ::failure::Error {
    ChatbotError::InvalidConfiguration(message.to_string()).into()
}
