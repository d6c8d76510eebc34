use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarMap};
use failure::{format_err, ResultExt};
use log::{debug, info, warn};
use ndarray::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::artifacts::CacheLookup;
use crate::configurations::{ReproducibilityConfiguration, TrainingConfiguration};
use crate::errors::*;
use crate::intent_classifier::network::{glorot_uniform_init, IntentNetwork};
use crate::intent_classifier::IntentClassifier;
use crate::models::{NeuralClassifierModel, TrainingArtifacts};
use crate::utils::write_json_file;

const CLASSIFIER_FILENAME: &str = "classifier.json";
const WEIGHTS_FILENAME: &str = "weights.safetensors";

const ADAM_BETA_1: f64 = 0.9;
const ADAM_BETA_2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;

/// Intent classifier backed by an [`IntentNetwork`].
///
/// Persisted as a directory holding `classifier.json` and the network
/// weights in safetensors format.
#[derive(Clone)]
pub struct NeuralIntentClassifier {
    varmap: VarMap,
    network: IntentNetwork,
    nb_features: usize,
    nb_labels: usize,
}

impl NeuralIntentClassifier {
    pub fn nb_features(&self) -> usize {
        self.nb_features
    }

    pub fn nb_labels(&self) -> usize {
        self.nb_labels
    }

    /// Flattened values of every network parameter, by name.
    pub fn parameters(&self) -> Result<BTreeMap<String, Vec<f32>>> {
        let data = self
            .varmap
            .data()
            .lock()
            .map_err(|_| format_err!("Classifier parameters are poisoned"))?;
        let mut parameters = BTreeMap::new();
        for (name, var) in data.iter() {
            parameters.insert(name.clone(), var.flatten_all()?.to_vec1::<f32>()?);
        }
        Ok(parameters)
    }

    /// Trains for a fixed number of epochs, without early stopping nor
    /// validation split.
    ///
    /// Training runs inside a thread pool of `training_threads` threads.
    pub fn train(
        artifacts: &TrainingArtifacts,
        config: &TrainingConfiguration,
        reproducibility: &ReproducibilityConfiguration,
    ) -> Result<Self> {
        config.validate()?;
        reproducibility.validate()?;
        let nb_examples = artifacts.nb_examples();
        if nb_examples == 0 {
            return Err(ChatbotError::Training("no training examples".to_string()).into());
        }
        if artifacts.outputs.nrows() != nb_examples {
            return Err(ChatbotError::Training(format!(
                "{} feature rows but {} output rows",
                nb_examples,
                artifacts.outputs.nrows()
            ))
            .into());
        }
        if artifacts.features.ncols() == 0 || artifacts.outputs.ncols() == 0 {
            return Err(ChatbotError::Training(
                "empty vocabulary or label set".to_string(),
            )
            .into());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(reproducibility.training_threads)
            .build()
            .with_context(|_| "Cannot build training thread pool")?;
        info!(
            "Training classifier on {} examples ({} epochs, batch size {}, {} thread(s)) ...",
            nb_examples, config.epochs, config.batch_size, reproducibility.training_threads
        );
        pool.install(|| Self::fit(artifacts, config, reproducibility))
    }

    fn fit(
        artifacts: &TrainingArtifacts,
        config: &TrainingConfiguration,
        reproducibility: &ReproducibilityConfiguration,
    ) -> Result<Self> {
        let device = Device::Cpu;
        let (nb_examples, nb_features) = artifacts.features.dim();
        let nb_labels = artifacts.outputs.ncols();
        let features = matrix_to_tensor(&artifacts.features, &device)?;
        let outputs = matrix_to_tensor(&artifacts.outputs, &device)?;

        let mut varmap = VarMap::new();
        let network = IntentNetwork::new(&varmap, nb_features, nb_labels, &device)?;
        let mut init_rng = ChaCha8Rng::seed_from_u64(reproducibility.training_seed);
        glorot_uniform_init(&mut varmap, nb_features, nb_labels, &device, &mut init_rng)?;
        let mut optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: f64::from(config.learning_rate),
                beta1: ADAM_BETA_1,
                beta2: ADAM_BETA_2,
                eps: ADAM_EPSILON,
                weight_decay: 0.,
            },
        )?;

        let mut shuffle_rng = ChaCha8Rng::seed_from_u64(reproducibility.shuffle_seed);
        let mut indices: Vec<u32> = (0..nb_examples as u32).collect();
        let mut epoch_loss = 0.;
        let mut epoch_accuracy = 0.;
        for epoch in 0..config.epochs {
            indices.shuffle(&mut shuffle_rng);
            let mut total_loss = 0.;
            let mut nb_correct = 0;
            for batch in indices.chunks(config.batch_size) {
                let batch_indices = Tensor::from_vec(batch.to_vec(), batch.len(), &device)?;
                let inputs = features.index_select(&batch_indices, 0)?;
                let targets = outputs.index_select(&batch_indices, 0)?;
                let predictions = network.forward(&inputs)?;
                let loss = candle_nn::loss::mse(&predictions, &targets)?;
                optimizer.backward_step(&loss)?;
                total_loss += loss.to_scalar::<f32>()? * batch.len() as f32;
                nb_correct += count_correct(&predictions, &targets)?;
            }
            epoch_loss = total_loss / nb_examples as f32;
            epoch_accuracy = nb_correct as f32 / nb_examples as f32;
            debug!(
                "Epoch {}/{} - loss: {:.4} - accuracy: {:.4}",
                epoch + 1,
                config.epochs,
                epoch_loss,
                epoch_accuracy
            );
        }
        info!(
            "Classifier trained (loss: {:.4}, accuracy: {:.4})",
            epoch_loss, epoch_accuracy
        );
        Ok(Self {
            varmap,
            network,
            nb_features,
            nb_labels,
        })
    }

    /// Absent, unreadable, undecodable or outdated classifiers are a miss.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CacheLookup<Self>> {
        let model_dir = path.as_ref();
        let metadata_path = model_dir.join(CLASSIFIER_FILENAME);
        let metadata_file = match File::open(&metadata_path) {
            Ok(file) => file,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No trained classifier found at {:?}", model_dir);
                return Ok(CacheLookup::Miss);
            }
            Err(e) => {
                warn!("Cannot open classifier file {:?}, retraining: {}", metadata_path, e);
                return Ok(CacheLookup::Miss);
            }
        };
        let model: NeuralClassifierModel =
            match serde_json::from_reader(BufReader::new(metadata_file)) {
                Ok(model) => model,
                Err(e) => {
                    warn!("Cannot decode classifier file {:?}, retraining: {}", metadata_path, e);
                    return Ok(CacheLookup::Miss);
                }
            };
        if model.model_version != crate::MODEL_VERSION {
            warn!(
                "Classifier {:?} has model version {} but {} is expected, retraining",
                model_dir,
                model.model_version,
                crate::MODEL_VERSION
            );
            return Ok(CacheLookup::Miss);
        }
        match Self::load_weights(&model, &model_dir.join(WEIGHTS_FILENAME)) {
            Ok(classifier) => {
                info!("Classifier loaded from {:?}", model_dir);
                Ok(CacheLookup::Hit(classifier))
            }
            Err(e) => {
                warn!("Cannot load classifier weights from {:?}, retraining: {}", model_dir, e);
                Ok(CacheLookup::Miss)
            }
        }
    }

    fn load_weights(model: &NeuralClassifierModel, weights_path: &Path) -> Result<Self> {
        let device = Device::Cpu;
        let mut varmap = VarMap::new();
        let network = IntentNetwork::new(&varmap, model.nb_features, model.nb_labels, &device)?;
        varmap.load(weights_path)?;
        Ok(Self {
            varmap,
            network,
            nb_features: model.nb_features,
            nb_labels: model.nb_labels,
        })
    }

    /// Writes `weights.safetensors`, then `classifier.json`.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let model_dir = path.as_ref();
        fs::create_dir_all(model_dir)
            .with_context(|_| format!("Cannot create directory {:?}", model_dir))?;
        let weights_path = model_dir.join(WEIGHTS_FILENAME);
        self.varmap
            .save(&weights_path)
            .with_context(|_| format!("Cannot write classifier weights {:?}", weights_path))?;
        let model = NeuralClassifierModel {
            model_version: crate::MODEL_VERSION.to_string(),
            nb_features: self.nb_features,
            nb_labels: self.nb_labels,
        };
        write_json_file(model_dir.join(CLASSIFIER_FILENAME), &model)?;
        info!("Classifier saved to {:?}", model_dir);
        Ok(())
    }
}

impl IntentClassifier for NeuralIntentClassifier {
    fn predict(&self, features: &ArrayView1<f32>) -> Result<Array1<f32>> {
        if features.len() != self.nb_features {
            return Err(ChatbotError::DimensionMismatch {
                expected: self.nb_features,
                found: features.len(),
            }
            .into());
        }
        let input = Tensor::from_vec(features.to_vec(), (1, self.nb_features), &Device::Cpu)?;
        let probabilities = self.network.forward(&input)?.squeeze(0)?.to_vec1::<f32>()?;
        Ok(Array1::from(probabilities))
    }
}

fn matrix_to_tensor(matrix: &Array2<f32>, device: &Device) -> Result<Tensor> {
    let values: Vec<f32> = matrix.iter().cloned().collect();
    Ok(Tensor::from_vec(values, matrix.dim(), device)?)
}

fn count_correct(predictions: &Tensor, targets: &Tensor) -> Result<usize> {
    let matches = predictions
        .argmax(D::Minus1)?
        .eq(&targets.argmax(D::Minus1)?)?
        .to_dtype(DType::F32)?
        .sum_all()?
        .to_scalar::<f32>()?;
    Ok(matches as usize)
}
