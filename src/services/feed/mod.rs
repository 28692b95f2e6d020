//! Request-level orchestration: resolves the tenant, applies the
//! personalization kill-switch, fetches candidates and signals, and turns
//! the ranked result into numbered feed items.

use crate::config::FeedConfig;
use crate::models::{
    FeedItem, FeedMode, FeedRequest, FeedResult, TenantConfig,
};
use crate::repositories::{
    SystemConfigRepository, TenantConfigRepository, UserSignalsRepository, VideoRepository,
};
use crate::services::ranking::{Ranker, RankingError, RankingModelDefinition};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed request: {0}")]
    InvalidRequest(String),

    #[error("invalid tenant or api key")]
    Unauthorized,

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;

pub struct FeedService {
    tenants: Arc<dyn TenantConfigRepository>,
    system_config: Arc<dyn SystemConfigRepository>,
    user_signals: Arc<dyn UserSignalsRepository>,
    videos: Arc<dyn VideoRepository>,
    ranker: Ranker,
    max_limit: i32,
    candidate_pool_size: i32,
}

impl FeedService {
    pub fn new(
        tenants: Arc<dyn TenantConfigRepository>,
        system_config: Arc<dyn SystemConfigRepository>,
        user_signals: Arc<dyn UserSignalsRepository>,
        videos: Arc<dyn VideoRepository>,
        ranker: Ranker,
        config: FeedConfig,
    ) -> Self {
        Self {
            tenants,
            system_config,
            user_signals,
            videos,
            ranker,
            max_limit: config.max_limit,
            candidate_pool_size: config.candidate_pool_size,
        }
    }

    pub async fn get_feed(&self, request: &FeedRequest) -> Result<FeedResult> {
        if request.tenant_id.trim().is_empty() {
            return Err(FeedError::InvalidRequest("tenant_id is required".into()));
        }
        if request.api_key.trim().is_empty() {
            return Err(FeedError::InvalidRequest("api_key is required".into()));
        }
        if request.user_hash.trim().is_empty() {
            return Err(FeedError::InvalidRequest("user_hash is required".into()));
        }

        let request_id = Uuid::new_v4();

        let tenant = self
            .tenants
            .get_by_tenant_and_api_key(&request.tenant_id, &request.api_key)
            .await?
            .ok_or(FeedError::Unauthorized)?;

        let globally_enabled = self
            .system_config
            .is_personalization_globally_enabled()
            .await?;
        let personalization_enabled = globally_enabled && tenant.use_personalization;

        let requested_limit = request.limit.unwrap_or(tenant.default_limit);
        let effective_limit = requested_limit.clamp(1, self.max_limit);

        let user_signals = if personalization_enabled {
            self.user_signals
                .get_by_tenant_and_user_hash(&request.tenant_id, &request.user_hash)
                .await?
        } else {
            None
        };

        let candidates = self
            .videos
            .get_candidate_videos(
                &request.tenant_id,
                self.candidate_pool_size,
                &tenant.maturity_policy,
            )
            .await?;

        let definition = model_definition_for(&tenant)?;

        let ranked = self.ranker.rank(
            &tenant,
            user_signals.as_ref(),
            &candidates,
            &definition,
            effective_limit,
        )?;

        let items: Vec<FeedItem> = ranked
            .into_iter()
            .enumerate()
            .map(|(rank, rv)| FeedItem {
                video: rv.video,
                score: rv.score,
                rank,
            })
            .collect();

        let mode = if personalization_enabled && user_signals.is_some() {
            FeedMode::Personalized
        } else {
            FeedMode::Fallback
        };

        debug!(
            request_id = %request_id,
            tenant_id = %request.tenant_id,
            mode = ?mode,
            item_count = items.len(),
            "feed assembled"
        );

        Ok(FeedResult {
            mode,
            items,
            next_cursor: None,
        })
    }
}

/// Tenant payloads pass through verbatim; tenants without one get the
/// documented default linear weights.
fn model_definition_for(tenant: &TenantConfig) -> Result<RankingModelDefinition> {
    if !tenant.ranking_model_type.eq_ignore_ascii_case("linear") {
        return Err(RankingError::UnsupportedModelType(tenant.ranking_model_type.clone()).into());
    }

    if let Some(payload) = tenant.ranking_model_payload.as_deref() {
        if !payload.trim().is_empty() {
            return Ok(RankingModelDefinition {
                model_type: tenant.ranking_model_type.clone(),
                model_version: tenant.ranking_model_version.clone(),
                payload: payload.to_string(),
            });
        }
    }

    Ok(default_linear_definition())
}

fn default_linear_definition() -> RankingModelDefinition {
    let payload = serde_json::json!({
        "weights": {
            "category_affinity": 5.0,
            "recency_hours": -0.05,
            "global_popularity_score": 1.0,
            "editorial_boost": 1.0,
            "user_watch_time_last7d": 0.001,
            "user_skip_rate_last7d": -1.0,
            "is_mature_content": -100.0
        },
        "bias": 0.0
    });

    RankingModelDefinition {
        model_type: "linear".to_string(),
        model_version: "default-1".to_string(),
        payload: payload.to_string(),
    }
}
