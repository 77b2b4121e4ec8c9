//! Learned models: comment sentiment classifier and ad receptiveness regressor

pub mod artifact;
pub mod receptiveness;
pub mod scaler;
pub mod sentiment;

pub use receptiveness::ReceptivenessModel;
pub use scaler::StandardScaler;
pub use sentiment::SentimentModel;
