//! Odds regression network
//!
//! Architecture: Input(n_features) → [Linear → ReLU]* → Linear(n_outputs)
//!
//! Inputs and outputs are in scaled space; the fitted scalers live outside
//! the network.

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::{Result, TennisError};

/// Configuration for the odds network
#[derive(Debug, Clone, PartialEq)]
pub struct OddsNetConfig {
    /// Number of input features
    pub input_dim: usize,
    /// Hidden layer widths (e.g., [64, 32] for two layers)
    pub hidden_dims: Vec<usize>,
    /// Number of predicted values
    pub output_dim: usize,
}

/// A single hidden layer block: Linear → ReLU
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        relu(self.linear.forward(x))
    }
}

/// Multi-layer perceptron regressing the two bookmaker odds
#[derive(Module, Debug)]
pub struct OddsNet<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    output: Linear<B>,
}

impl<B: Backend> OddsNet<B> {
    /// Create a freshly initialised network
    pub fn new(device: &B::Device, config: &OddsNetConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = config.input_dim;
        for &width in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, width));
            in_dim = width;
        }

        OddsNet {
            hidden,
            output: LinearConfig::new(in_dim, config.output_dim).init(device),
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Scaled features [batch, input_dim]
    ///
    /// # Returns
    /// Scaled predictions [batch, output_dim]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden.iter().fold(x, |x, block| block.forward(x));
        self.output.forward(x)
    }

    /// Run a single scaled feature vector through the network
    pub fn predict_one(&self, input: &[f32], device: &B::Device) -> Result<Vec<f32>> {
        let x = Tensor::<B, 1>::from_floats(input, device).reshape([1, input.len()]);
        self.forward(x)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| TennisError::Inference(format!("{:?}", e)))
    }

    /// Check that every layer has the shape `config` describes
    pub fn check_shapes(&self, config: &OddsNetConfig) -> Result<()> {
        if self.hidden.len() != config.hidden_dims.len() {
            return Err(TennisError::ShapeMismatch {
                what: "hidden layer count".to_string(),
                expected: config.hidden_dims.len(),
                actual: self.hidden.len(),
            });
        }

        let mut in_dim = config.input_dim;
        for (i, (block, &width)) in self.hidden.iter().zip(&config.hidden_dims).enumerate() {
            check_linear(&block.linear, in_dim, width, &format!("hidden layer {}", i + 1))?;
            in_dim = width;
        }
        check_linear(&self.output, in_dim, config.output_dim, "output layer")
    }

    /// Save model to file
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| TennisError::Io(std::io::Error::other(e.to_string())))
    }

    /// Load model from file and verify its layer shapes
    pub fn load(device: &B::Device, path: &str, config: &OddsNetConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| TennisError::Artifact {
                path: format!("{}.mpk", path),
                message: e.to_string(),
            })?;

        let model = Self::new(device, config).load_record(record);
        model.check_shapes(config)?;
        Ok(model)
    }
}

fn check_linear<B: Backend>(layer: &Linear<B>, in_dim: usize, out_dim: usize, what: &str) -> Result<()> {
    // Weights are stored [d_input, d_output]
    let [rows, cols] = layer.weight.val().dims();
    if rows != in_dim {
        return Err(TennisError::ShapeMismatch {
            what: format!("{} inputs", what),
            expected: in_dim,
            actual: rows,
        });
    }
    if cols != out_dim {
        return Err(TennisError::ShapeMismatch {
            what: format!("{} outputs", what),
            expected: out_dim,
            actual: cols,
        });
    }
    Ok(())
}
