//! Neural network architecture
//!
//! A plain MLP regressor mapping scaled match features to scaled odds.

pub mod odds_net;

pub use odds_net::{OddsNet, OddsNetConfig};
