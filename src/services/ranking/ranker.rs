use super::{RankingModel, RankingModelDefinition, Result};
use crate::models::{RankedVideo, TenantConfig, UserSignals, Video};
use crate::services::diversity::FeedDiversifier;
use crate::services::features::FeatureExtractor;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Orchestrates extractor → model → sort → diversifier for one request.
pub struct Ranker {
    extractor: FeatureExtractor,
    diversifier: FeedDiversifier,
}

impl Ranker {
    pub fn new(extractor: FeatureExtractor, diversifier: FeedDiversifier) -> Self {
        Self {
            extractor,
            diversifier,
        }
    }

    /// Ranks `candidates` for one request, capturing a single instant so
    /// recency stays comparable across the whole batch.
    ///
    /// Model errors (unsupported type, malformed payload) propagate
    /// unmodified; there is no fallback scoring.
    pub fn rank(
        &self,
        tenant: &TenantConfig,
        user: Option<&UserSignals>,
        candidates: &[Video],
        definition: &RankingModelDefinition,
        limit: i32,
    ) -> Result<Vec<RankedVideo>> {
        self.rank_at(tenant, user, candidates, definition, limit, Utc::now())
    }

    /// Same as [`rank`](Self::rank) with an explicit reference instant.
    pub fn rank_at(
        &self,
        tenant: &TenantConfig,
        user: Option<&UserSignals>,
        candidates: &[Video],
        definition: &RankingModelDefinition,
        limit: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedVideo>> {
        let model = RankingModel::from_definition(definition)?;

        let mut scored: Vec<RankedVideo> = candidates
            .iter()
            .map(|video| {
                let features = self.extractor.extract(tenant, user, video, now);
                RankedVideo {
                    video: video.clone(),
                    score: model.score(&features),
                }
            })
            .collect();

        // Stable sort: equal scores keep the candidate input order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            tenant_id = %tenant.tenant_id,
            candidate_count = candidates.len(),
            top_score = scored.first().map(|rv| rv.score),
            "scored candidates"
        );

        Ok(self.diversifier.diversify(scored, limit))
    }
}
