//! CLI command handlers
//!
//! Each subcommand is implemented in its own module. Handlers receive the
//! loaded [`crate::config::PipelineConfig`] and their own arguments.

pub mod helpers;
pub mod predict;
pub mod score;
pub mod train_receptiveness;
pub mod train_sentiment;
