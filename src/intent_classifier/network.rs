use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{linear, Linear, VarBuilder, VarMap};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

pub const HIDDEN_LINEAR_UNITS: usize = 8;
pub const HIDDEN_RELU_UNITS: usize = 10;

const HIDDEN_LINEAR_LAYER: &str = "hidden_linear";
const HIDDEN_RELU_LAYER: &str = "hidden_relu";
const OUTPUT_LAYER: &str = "output";

/// Feed-forward network with a vocabulary-sized input, 8 linear units,
/// 10 ReLU units and a softmax over the labels.
///
/// Parameters live in the `VarMap` the network was built from, under
/// `<layer>.weight` and `<layer>.bias`.
#[derive(Debug, Clone)]
pub struct IntentNetwork {
    hidden_linear: Linear,
    hidden_relu: Linear,
    output: Linear,
}

impl IntentNetwork {
    pub fn new(
        varmap: &VarMap,
        nb_features: usize,
        nb_labels: usize,
        device: &Device,
    ) -> candle_core::Result<Self> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, device);
        Ok(Self {
            hidden_linear: linear(nb_features, HIDDEN_LINEAR_UNITS, vb.pp(HIDDEN_LINEAR_LAYER))?,
            hidden_relu: linear(HIDDEN_LINEAR_UNITS, HIDDEN_RELU_UNITS, vb.pp(HIDDEN_RELU_LAYER))?,
            output: linear(HIDDEN_RELU_UNITS, nb_labels, vb.pp(OUTPUT_LAYER))?,
        })
    }
}

impl Module for IntentNetwork {
    /// Maps a `(batch, features)` tensor to `(batch, labels)` probabilities.
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.hidden_linear.forward(xs)?;
        let xs = self.hidden_relu.forward(&xs)?.relu()?;
        let logits = self.output.forward(&xs)?;
        candle_nn::ops::softmax(&logits, D::Minus1)
    }
}

fn layer_shapes(nb_features: usize, nb_labels: usize) -> [(&'static str, usize, usize); 3] {
    [
        (HIDDEN_LINEAR_LAYER, nb_features, HIDDEN_LINEAR_UNITS),
        (HIDDEN_RELU_LAYER, HIDDEN_LINEAR_UNITS, HIDDEN_RELU_UNITS),
        (OUTPUT_LAYER, HIDDEN_RELU_UNITS, nb_labels),
    ]
}

/// Overwrites the network parameters with Glorot-uniform weights and zero
/// biases, drawn layer after layer from `rng`.
pub fn glorot_uniform_init<R: Rng + ?Sized>(
    varmap: &mut VarMap,
    nb_features: usize,
    nb_labels: usize,
    device: &Device,
    rng: &mut R,
) -> candle_core::Result<()> {
    for &(name, nb_inputs, nb_units) in layer_shapes(nb_features, nb_labels).iter() {
        let limit = (6. / (nb_inputs + nb_units) as f32).sqrt();
        let weights =
            Array2::<f32>::random_using((nb_units, nb_inputs), Uniform::new(-limit, limit), rng);
        let weights = Tensor::from_vec(weights.into_raw_vec(), (nb_units, nb_inputs), device)?;
        varmap.set_one(format!("{}.weight", name), weights)?;
        varmap.set_one(format!("{}.bias", name), Tensor::zeros(nb_units, DType::F32, device)?)?;
    }
    Ok(())
}
