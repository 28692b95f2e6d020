// ============================================
// Feature Extraction Module
// ============================================
// Turns (tenant config, optional user signals, candidate, instant) into the
// numeric feature vector consumed by the scoring model.

use crate::models::{TenantConfig, UserSignals, Video};
use chrono::{DateTime, Utc};

/// Ratings counted as mature for the scoring feature. This is a coarse
/// string heuristic, kept separate from the ordinal policy in
/// `utils::maturity` that gates candidate retrieval.
const MATURE_RATINGS: [&str; 4] = ["R", "NC17", "18+", "M"];

/// Derived per-(tenant, user, candidate, instant) feature vector.
///
/// Ephemeral: computed for one scoring pass and never persisted. All
/// numeric fields are finite even when the user has no profile.
#[derive(Debug, Clone)]
pub struct RankingFeatures {
    pub tenant_id: String,
    pub user_hash: String,
    pub video_id: String,
    pub main_tag: String,

    /// Share of this candidate's main tag in the user's total views, 0..1.
    pub category_affinity: f64,
    pub recency_hours: f64,
    pub global_popularity_score: f64,
    pub editorial_boost: f64,
    /// Seconds, converted from the stored milliseconds for scale.
    pub user_watch_time_last7d: f64,
    pub user_skip_rate_last7d: f64,
    pub is_mature_content: bool,
}

/// Pure extractor: same inputs and `now` always produce the same features.
/// The reference instant is passed in, never read from the wall clock here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(
        &self,
        tenant: &TenantConfig,
        user: Option<&UserSignals>,
        video: &Video,
        now: DateTime<Utc>,
    ) -> RankingFeatures {
        let recency_hours =
            ((now - video.created_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0);

        let mut category_affinity = 0.0;
        let mut user_watch_time_last7d = 0.0;
        let mut user_skip_rate_last7d = 0.0;
        let mut user_hash = String::new();

        if let Some(user) = user {
            user_hash = user.user_hash.clone();

            if user.total_views_last7d > 0 {
                if let Some(stats) = user.category_stats.get(&video.main_tag) {
                    category_affinity = stats.views as f64 / user.total_views_last7d as f64;
                }
            }

            user_watch_time_last7d = user.total_watch_time_last7d_ms as f64 / 1000.0;
            user_skip_rate_last7d = user.skip_rate_last7d;
        }

        RankingFeatures {
            tenant_id: tenant.tenant_id.clone(),
            user_hash,
            video_id: video.video_id.clone(),
            main_tag: video.main_tag.clone(),
            category_affinity,
            recency_hours,
            global_popularity_score: video.global_popularity_score,
            editorial_boost: video.editorial_boost,
            user_watch_time_last7d,
            user_skip_rate_last7d,
            is_mature_content: is_mature(&video.maturity_rating),
        }
    }
}

fn is_mature(rating: &str) -> bool {
    let rating = rating.trim().to_uppercase();
    MATURE_RATINGS.contains(&rating.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryStats;
    use chrono::Duration;
    use std::collections::HashMap;

    fn test_tenant() -> TenantConfig {
        TenantConfig {
            tenant_id: "tenant_1".to_string(),
            api_key: "secret".to_string(),
            use_personalization: true,
            default_limit: 20,
            maturity_policy: "PG13".to_string(),
            ranking_model_type: "linear".to_string(),
            ranking_model_version: "1.0.0".to_string(),
            ranking_model_payload: None,
            feature_flags: None,
        }
    }

    fn test_video(created_at: DateTime<Utc>) -> Video {
        Video {
            tenant_id: "tenant_1".to_string(),
            video_id: "vid_1".to_string(),
            playback_url: "https://cdn.example.com/v/vid_1.m3u8".to_string(),
            thumbnail_url: None,
            title: "Fitness warmup".to_string(),
            main_tag: "fitness".to_string(),
            tags: vec!["fitness".to_string()],
            duration_seconds: 30,
            maturity_rating: "PG".to_string(),
            editorial_boost: 1.5,
            global_popularity_score: 5.0,
            created_at,
            updated_at: created_at,
            is_active: true,
        }
    }

    fn test_signals() -> UserSignals {
        let mut category_stats = HashMap::new();
        category_stats.insert(
            "fitness".to_string(),
            CategoryStats {
                views: 8,
                watch_time_ms: 120_000,
                skips: 1,
            },
        );
        category_stats.insert(
            "cooking".to_string(),
            CategoryStats {
                views: 2,
                watch_time_ms: 10_000,
                skips: 0,
            },
        );

        UserSignals {
            category_stats,
            total_views_last7d: 10,
            total_watch_time_last7d_ms: 130_000,
            skip_rate_last7d: 0.1,
            ..UserSignals::empty("tenant_1", "user_hash_123")
        }
    }

    #[test]
    fn absent_user_yields_zeroed_profile_features() {
        let now = Utc::now();
        let features =
            FeatureExtractor::new().extract(&test_tenant(), None, &test_video(now), now);

        assert_eq!(features.category_affinity, 0.0);
        assert_eq!(features.user_watch_time_last7d, 0.0);
        assert_eq!(features.user_skip_rate_last7d, 0.0);
        assert!(features.user_hash.is_empty());
    }

    #[test]
    fn affinity_is_the_tag_share_of_total_views() {
        let now = Utc::now();
        let signals = test_signals();
        let features = FeatureExtractor::new().extract(
            &test_tenant(),
            Some(&signals),
            &test_video(now),
            now,
        );

        assert!((features.category_affinity - 0.8).abs() < 1e-9);
        assert!((features.user_watch_time_last7d - 130.0).abs() < 1e-9);
        assert!((features.user_skip_rate_last7d - 0.1).abs() < 1e-9);
    }

    #[test]
    fn zero_total_views_means_zero_affinity() {
        let now = Utc::now();
        let mut signals = test_signals();
        signals.total_views_last7d = 0;

        let features = FeatureExtractor::new().extract(
            &test_tenant(),
            Some(&signals),
            &test_video(now),
            now,
        );

        assert_eq!(features.category_affinity, 0.0);
        assert!(features.category_affinity.is_finite());
    }

    #[test]
    fn untracked_tag_means_zero_affinity() {
        let now = Utc::now();
        let signals = test_signals();
        let mut video = test_video(now);
        video.main_tag = "travel".to_string();

        let features =
            FeatureExtractor::new().extract(&test_tenant(), Some(&signals), &video, now);

        assert_eq!(features.category_affinity, 0.0);
    }

    #[test]
    fn recency_is_fractional_hours_clamped_at_zero() {
        let now = Utc::now();
        let video = test_video(now - Duration::minutes(90));
        let features = FeatureExtractor::new().extract(&test_tenant(), None, &video, now);
        assert!((features.recency_hours - 1.5).abs() < 1e-6);

        // a candidate stamped in the future never goes negative
        let future_video = test_video(now + Duration::hours(3));
        let features = FeatureExtractor::new().extract(&test_tenant(), None, &future_video, now);
        assert_eq!(features.recency_hours, 0.0);
    }

    #[test]
    fn mature_flag_matches_the_token_set() {
        let now = Utc::now();
        for rating in ["R", "NC17", "18+", "M", " r ", "m"] {
            let mut video = test_video(now);
            video.maturity_rating = rating.to_string();
            let features = FeatureExtractor::new().extract(&test_tenant(), None, &video, now);
            assert!(features.is_mature_content, "rating {rating:?} should flag mature");
        }

        for rating in ["G", "PG", "PG13", ""] {
            let mut video = test_video(now);
            video.maturity_rating = rating.to_string();
            let features = FeatureExtractor::new().extract(&test_tenant(), None, &video, now);
            assert!(!features.is_mature_content, "rating {rating:?} should not flag mature");
        }
    }
}
