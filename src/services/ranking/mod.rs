/// Ranking Module
///
/// Scores candidates for one feed request and hands the score-ordered list
/// to the diversifier.
///
/// # Workflow
/// 1. Build the scoring model from the tenant's model definition (type tag)
/// 2. Extract features for every candidate against one shared instant
/// 3. Score, stable-sort descending, diversify, truncate
pub mod model;
pub mod ranker;

pub use model::{LinearModelConfig, LinearWeights, RankingModel, RankingModelDefinition};
pub use ranker::Ranker;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("unsupported ranking model type '{0}'")]
    UnsupportedModelType(String),

    #[error("malformed ranking model payload: {0}")]
    MalformedPayload(String),
}

pub type Result<T> = std::result::Result<T, RankingError>;
