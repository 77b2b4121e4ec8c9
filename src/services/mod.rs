//! External service clients

pub mod toxicity;

pub use toxicity::{HttpToxicityScorer, ToxicityScorer};
