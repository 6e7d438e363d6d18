//! Prediction and inference
//!
//! Load the trained model with its artifacts and generate predictions.

pub mod inference;

pub use inference::{format_prediction, format_prediction_csv, Predictor};
