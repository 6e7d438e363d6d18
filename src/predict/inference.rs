//! Model inference for predictions

use burn::tensor::backend::Backend;

use crate::artifacts::Artifacts;
use crate::features::{engineer_features, FeatureRecord};
use crate::form::{Form, FormValues};
use crate::model::{OddsNet, OddsNetConfig};
use crate::{Config, Prediction, Result, TennisError};

/// Predictor for making odds predictions
pub struct Predictor<B: Backend> {
    model: OddsNet<B>,
    artifacts: Artifacts,
    form: Form,
    device: B::Device,
}

impl<B: Backend> Predictor<B> {
    /// Create a new predictor, checking the model against the feature lists
    pub fn new(
        model: OddsNet<B>,
        artifacts: Artifacts,
        hidden_dims: Vec<usize>,
        device: B::Device,
    ) -> Result<Self> {
        model.check_shapes(&network_config(&artifacts, hidden_dims))?;
        let form = Form::build(&artifacts.encoders);

        Ok(Predictor {
            model,
            artifacts,
            form,
            device,
        })
    }

    /// Load the model and every artifact named in the config
    pub fn load(config: &Config, device: B::Device) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let model_file = config.model_file();
        if !std::path::Path::new(&model_file).exists() {
            return Err(TennisError::NoModel(model_file));
        }

        let artifacts = Artifacts::load(&config.artifacts)?;
        let net_config = network_config(&artifacts, config.model.hidden_dims.clone());
        let model = OddsNet::load(&device, &config.artifacts.model_path, &net_config)?;
        log::info!(
            "Loaded model from {} ({} inputs, {} outputs)",
            model_file,
            net_config.input_dim,
            net_config.output_dim
        );

        Self::new(model, artifacts, config.model.hidden_dims.clone(), device)
    }

    /// Predict from the text entered in the form
    pub fn predict(&self, values: &FormValues) -> Result<Prediction> {
        let record = self.form.encode(values, &self.artifacts.encoders)?;
        self.predict_record(&record)
    }

    /// Predict from an encoded record, before feature engineering
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<Prediction> {
        let features = engineer_features(record)?;
        let input = features.to_vector(&self.artifacts.features.input_features)?;
        log::debug!("Feature vector: {:?}", input);

        let scaled = self.artifacts.scalers.input_scaler.transform(&input)?;
        let scaled: Vec<f32> = scaled.iter().map(|&v| v as f32).collect();

        let output = self.model.predict_one(&scaled, &self.device)?;
        let output: Vec<f64> = output.iter().map(|&v| v as f64).collect();
        let odds = self.artifacts.scalers.output_scaler.inverse_transform(&output)?;

        if let Some(bad) = odds.iter().find(|v| !v.is_finite()) {
            return Err(TennisError::NonFinite {
                name: "predicted odds".to_string(),
                value: *bad,
            });
        }

        let names = &self.artifacts.features.output_features;
        Ok(Prediction::new(
            names[0].clone(),
            odds[0],
            names[1].clone(),
            odds[1],
        ))
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }
}

/// Network layout implied by the feature lists
pub fn network_config(artifacts: &Artifacts, hidden_dims: Vec<usize>) -> OddsNetConfig {
    OddsNetConfig {
        input_dim: artifacts.features.input_dim(),
        hidden_dims,
        output_dim: artifacts.features.output_dim(),
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &Prediction) -> String {
    format!(
        "Prediction Results:\n\n\
         {} (Win Odds): {:.4}\n\
         {} (Loss Odds): {:.4}\n\n\
         Confidence Assessment: {}\n",
        pred.win_label, pred.win_odds, pred.loss_label, pred.loss_odds, pred.confidence
    )
}

/// Format a prediction as a CSV header and row
pub fn format_prediction_csv(pred: &Prediction) -> String {
    format!(
        "{},{},ratio,confidence\n{:.4},{:.4},{:.4},{}\n",
        pred.win_label,
        pred.loss_label,
        pred.win_odds,
        pred.loss_odds,
        pred.ratio(),
        pred.confidence
    )
}
