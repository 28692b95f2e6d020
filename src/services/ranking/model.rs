/// Scoring Model Module
///
/// Models are selected purely by the type tag carried in the definition;
/// each variant owns its payload schema and scoring function. Adding a
/// variant touches only this module, never the ranker or diversifier.
use super::{RankingError, Result};
use crate::services::features::RankingFeatures;
use serde::{Deserialize, Serialize};

/// Type-tagged model definition as stored in tenant configuration.
///
/// `payload` is an opaque JSON document; its schema belongs to the variant
/// the tag selects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingModelDefinition {
    pub model_type: String,
    pub model_version: String,
    pub payload: String,
}

/// Named coefficients for the linear variant, one per feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub category_affinity: f64,
    pub recency_hours: f64,
    pub global_popularity_score: f64,
    pub editorial_boost: f64,
    pub user_watch_time_last7d: f64,
    pub user_skip_rate_last7d: f64,
    pub is_mature_content: f64,
}

/// Wire schema of the linear payload: `{"weights": {...}, "bias": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModelConfig {
    pub weights: LinearWeights,
    pub bias: f64,
}

/// Scoring model variants, keyed by the definition's type tag.
#[derive(Debug, Clone)]
pub enum RankingModel {
    Linear(LinearModelConfig),
}

impl RankingModel {
    /// Decodes a definition into a ready-to-score model.
    ///
    /// Fails with `UnsupportedModelType` when the tag is not recognized
    /// (matched case-insensitively) and `MalformedPayload` when the payload
    /// does not decode into the variant's schema.
    pub fn from_definition(definition: &RankingModelDefinition) -> Result<Self> {
        match definition.model_type.to_ascii_lowercase().as_str() {
            "linear" => {
                let config: LinearModelConfig = serde_json::from_str(&definition.payload)
                    .map_err(|e| RankingError::MalformedPayload(e.to_string()))?;
                Ok(RankingModel::Linear(config))
            }
            _ => Err(RankingError::UnsupportedModelType(
                definition.model_type.clone(),
            )),
        }
    }

    /// Raw weighted sum plus bias; no normalization, clipping, or
    /// activation. The boolean feature contributes its weight only when set.
    pub fn score(&self, features: &RankingFeatures) -> f64 {
        match self {
            RankingModel::Linear(config) => {
                let w = &config.weights;
                w.category_affinity * features.category_affinity
                    + w.recency_hours * features.recency_hours
                    + w.global_popularity_score * features.global_popularity_score
                    + w.editorial_boost * features.editorial_boost
                    + w.user_watch_time_last7d * features.user_watch_time_last7d
                    + w.user_skip_rate_last7d * features.user_skip_rate_last7d
                    + w.is_mature_content * f64::from(features.is_mature_content)
                    + config.bias
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(
        category_affinity: f64,
        recency_hours: f64,
        global_popularity_score: f64,
        editorial_boost: f64,
        user_watch_time_last7d: f64,
        user_skip_rate_last7d: f64,
        is_mature_content: bool,
    ) -> RankingFeatures {
        RankingFeatures {
            tenant_id: "tenant_1".to_string(),
            user_hash: "user_hash_123".to_string(),
            video_id: "vid_1".to_string(),
            main_tag: "fitness".to_string(),
            category_affinity,
            recency_hours,
            global_popularity_score,
            editorial_boost,
            user_watch_time_last7d,
            user_skip_rate_last7d,
            is_mature_content,
        }
    }

    fn definition(model_type: &str, payload: &str) -> RankingModelDefinition {
        RankingModelDefinition {
            model_type: model_type.to_string(),
            model_version: "1.0.0".to_string(),
            payload: payload.to_string(),
        }
    }

    fn test_config() -> LinearModelConfig {
        LinearModelConfig {
            weights: LinearWeights {
                category_affinity: 2.0,
                recency_hours: -1.0,
                global_popularity_score: 0.5,
                editorial_boost: 1.0,
                user_watch_time_last7d: 0.01,
                user_skip_rate_last7d: -3.0,
                is_mature_content: -100.0,
            },
            bias: 0.5,
        }
    }

    #[test]
    fn linear_score_is_exactly_dot_product_plus_bias() {
        let payload = serde_json::to_string(&test_config()).unwrap();
        let model = RankingModel::from_definition(&definition("linear", &payload)).unwrap();

        let score = model.score(&features(2.0, 3.0, 4.0, 5.0, 6.0, 0.5, false));

        // 2*2 - 1*3 + 0.5*4 + 1*5 + 0.01*6 - 3*0.5 - 100*0 + 0.5
        assert!((score - 7.06).abs() < 1e-9);
    }

    #[test]
    fn mature_weight_applies_only_when_flag_set() {
        let payload = serde_json::to_string(&test_config()).unwrap();
        let model = RankingModel::from_definition(&definition("linear", &payload)).unwrap();

        let clean = model.score(&features(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, false));
        let mature = model.score(&features(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, true));

        assert!((clean - 0.5).abs() < 1e-9);
        assert!((mature - (0.5 - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn type_tag_is_matched_case_insensitively() {
        let payload = serde_json::to_string(&test_config()).unwrap();
        assert!(RankingModel::from_definition(&definition("Linear", &payload)).is_ok());
        assert!(RankingModel::from_definition(&definition("LINEAR", &payload)).is_ok());
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let result = RankingModel::from_definition(&definition("gbdt", "{}"));
        assert!(matches!(
            result,
            Err(RankingError::UnsupportedModelType(t)) if t == "gbdt"
        ));
    }

    #[test]
    fn undecodable_payload_is_rejected() {
        let result = RankingModel::from_definition(&definition("linear", "not json"));
        assert!(matches!(result, Err(RankingError::MalformedPayload(_))));

        let result = RankingModel::from_definition(&definition("linear", r#"{"bias": 1.0}"#));
        assert!(matches!(result, Err(RankingError::MalformedPayload(_))));
    }

    #[test]
    fn payload_round_trips_through_serde() {
        let config = test_config();
        let payload = serde_json::to_string(&config).unwrap();
        let decoded: LinearModelConfig = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded, config);
    }
}
