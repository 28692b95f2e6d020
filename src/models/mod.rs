use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A content item eligible for ranking. Owned by the candidate-retrieval
/// side; the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub tenant_id: String,
    pub video_id: String,

    pub playback_url: String,
    pub thumbnail_url: Option<String>,

    pub title: String,
    pub main_tag: String,
    #[serde(default)]
    pub tags: Vec<String>,

    pub duration_seconds: i32,

    pub maturity_rating: String,
    pub editorial_boost: f64,
    pub global_popularity_score: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Per-tenant configuration, supplied per request and read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub tenant_id: String,
    pub api_key: String,

    pub use_personalization: bool,
    pub default_limit: i32,
    pub maturity_policy: String,

    pub ranking_model_type: String,
    pub ranking_model_version: String,
    pub ranking_model_payload: Option<String>,

    pub feature_flags: Option<String>,
}

/// Per-tag counters, merged additively. Counters never decrease within a
/// single ingestion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub views: i64,
    pub watch_time_ms: i64,
    pub skips: i64,
}

/// Rolling per-user behavioral profile over an implicit trailing window.
///
/// Snapshots are replaced wholesale on each ingestion cycle, never patched
/// in place, so the read-modify-write race lives entirely at the store
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSignals {
    pub tenant_id: String,
    pub user_hash: String,

    pub category_stats: HashMap<String, CategoryStats>,

    pub total_views_last7d: i64,
    pub total_watch_time_last7d_ms: i64,
    pub skip_rate_last7d: f64,

    pub last_active_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSignals {
    /// Zero-valued aggregate for a user with no recorded history.
    pub fn empty(tenant_id: impl Into<String>, user_hash: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_hash: user_hash.into(),
            category_stats: HashMap::new(),
            total_views_last7d: 0,
            total_watch_time_last7d_ms: 0,
            skip_rate_last7d: 0.0,
            last_active_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEventType {
    VideoView,
    Like,
    Skip,
    Share,
}

/// One raw interaction event as delivered by the intake edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEvent {
    pub tenant_id: String,
    pub user_hash: String,
    pub event_type: UserEventType,
    pub video_id: String,
    pub timestamp: DateTime<Utc>,
    pub watch_time_ms: Option<i64>,
    pub feed_request_id: Option<String>,
    pub rank_position: Option<i32>,
}

/// Events for one (tenant, user), folded together in a single ingestion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEventBatch {
    pub tenant_id: String,
    pub user_hash: String,
    pub events: Vec<UserEvent>,
}

/// A scored candidate, ordered by score descending. Ties keep the stable
/// order the candidates were scored in.
#[derive(Debug, Clone)]
pub struct RankedVideo {
    pub video: Video,
    pub score: f64,
}

/// Final feed unit: rank is the zero-based position after diversification.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub video: Video,
    pub score: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    Personalized,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub tenant_id: String,
    pub api_key: String,
    pub user_hash: String,
    pub limit: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct FeedResult {
    pub mode: FeedMode,
    pub items: Vec<FeedItem>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signals_have_minimal_timestamps_and_zero_totals() {
        let signals = UserSignals::empty("tenant_1", "user_hash_123");

        assert_eq!(signals.total_views_last7d, 0);
        assert_eq!(signals.total_watch_time_last7d_ms, 0);
        assert_eq!(signals.skip_rate_last7d, 0.0);
        assert!(signals.category_stats.is_empty());
        assert_eq!(signals.last_active_at, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn event_type_uses_snake_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&UserEventType::VideoView).unwrap(),
            "\"video_view\""
        );
        let parsed: UserEventType = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(parsed, UserEventType::Skip);
    }
}
