//! Model artifact persistence
//!
//! Both models serialize to versioned bincode blobs. Loading verifies the
//! artifact format version and, for the sentiment classifier, surfaces the
//! embedded feature schema so the runtime extractor can be checked against
//! it before any inference is served. A missing or corrupt artifact is fatal
//! at startup; the pipeline never runs with a partially loaded model.

use crate::error::{AdPulseError, Result};
use crate::model::{ReceptivenessModel, SentimentModel};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Artifact container format version
pub const ARTIFACT_VERSION: u32 = 1;

/// Versioned envelope around a serialized model
#[derive(Debug, Serialize, Deserialize)]
struct Artifact<M> {
    version: u32,
    model: M,
}

fn save<M: Serialize>(model: &M, path: &Path, kind: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let artifact = Artifact {
        version: ARTIFACT_VERSION,
        model,
    };

    let bytes = bincode::serialize(&artifact)?;
    fs::write(path, bytes)?;

    info!("Saved {} artifact to {:?}", kind, path);
    Ok(())
}

fn load<M: DeserializeOwned>(path: &Path, kind: &str) -> Result<M> {
    let bytes = fs::read(path).map_err(|e| {
        AdPulseError::ModelLoad(format!("Cannot read {} artifact {:?}: {}", kind, path, e))
    })?;

    let artifact: Artifact<M> = bincode::deserialize(&bytes).map_err(|e| {
        AdPulseError::ModelLoad(format!("Corrupt {} artifact {:?}: {}", kind, path, e))
    })?;

    if artifact.version != ARTIFACT_VERSION {
        return Err(AdPulseError::ModelLoad(format!(
            "Artifact {:?} has version {}, expected {}",
            path, artifact.version, ARTIFACT_VERSION
        )));
    }

    info!("Loaded {} artifact from {:?}", kind, path);
    Ok(artifact.model)
}

/// Save the sentiment classifier (weights + scaler + schema)
pub fn save_sentiment(model: &SentimentModel, path: &Path) -> Result<()> {
    save(model, path, "sentiment")
}

/// Load the sentiment classifier
pub fn load_sentiment(path: &Path) -> Result<SentimentModel> {
    load(path, "sentiment")
}

/// Save the receptiveness regressor
pub fn save_receptiveness(model: &ReceptivenessModel, path: &Path) -> Result<()> {
    save(model, path, "receptiveness")
}

/// Load the receptiveness regressor
pub fn load_receptiveness(path: &Path) -> Result<ReceptivenessModel> {
    load(path, "receptiveness")
}
