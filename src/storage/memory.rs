//! In-memory implementation of every repository trait.
//!
//! Backs local runs and tests. Maps are keyed per tenant so data stays
//! segregated the same way a real store would partition it.

use crate::models::{CategoryStats, TenantConfig, UserSignals, Video};
use crate::repositories::{
    SystemConfigRepository, TenantConfigRepository, UserSignalsRepository, VideoRepository,
};
use crate::utils::maturity;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct InMemoryStore {
    tenants: DashMap<String, TenantConfig>,
    user_signals: DashMap<(String, String), UserSignals>,
    videos: DashMap<(String, String), Video>,
    personalization_enabled: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
            user_signals: DashMap::new(),
            videos: DashMap::new(),
            personalization_enabled: AtomicBool::new(true),
        }
    }

    /// Store preloaded with a demo tenant, two videos, and a user whose
    /// history leans heavily toward "fitness".
    pub fn seeded() -> Self {
        let store = Self::new();
        store.seed();
        store
    }

    pub fn insert_tenant(&self, tenant: TenantConfig) {
        self.tenants.insert(tenant.tenant_id.clone(), tenant);
    }

    pub fn insert_video(&self, video: Video) {
        self.videos
            .insert((video.tenant_id.clone(), video.video_id.clone()), video);
    }

    pub fn insert_user_signals(&self, signals: UserSignals) {
        self.user_signals.insert(
            (signals.tenant_id.clone(), signals.user_hash.clone()),
            signals,
        );
    }

    pub fn set_personalization_globally_enabled(&self, enabled: bool) {
        self.personalization_enabled
            .store(enabled, Ordering::Relaxed);
    }

    fn seed(&self) {
        let tenant_id = "tenant_1";
        let now = seed_instant();

        let weights = serde_json::json!({
            "weights": {
                "category_affinity": 15.0,
                "recency_hours": -0.1,
                "global_popularity_score": 0.5,
                "editorial_boost": 0.0,
                "user_watch_time_last7d": 0.0,
                "user_skip_rate_last7d": 0.0,
                "is_mature_content": -100.0
            },
            "bias": 0.0
        });

        self.insert_tenant(TenantConfig {
            tenant_id: tenant_id.to_string(),
            api_key: "secret-api-key".to_string(),
            use_personalization: true,
            default_limit: 20,
            maturity_policy: "PG13".to_string(),
            ranking_model_type: "linear".to_string(),
            ranking_model_version: "seed-weights".to_string(),
            ranking_model_payload: Some(weights.to_string()),
            feature_flags: None,
        });

        self.insert_video(Video {
            tenant_id: tenant_id.to_string(),
            video_id: "vid_fitness_1".to_string(),
            playback_url: "https://cdn.example.com/v/vid_fitness.m3u8".to_string(),
            thumbnail_url: None,
            title: "Fitness warmup".to_string(),
            main_tag: "fitness".to_string(),
            tags: vec!["fitness".to_string()],
            duration_seconds: 30,
            maturity_rating: "PG".to_string(),
            editorial_boost: 0.0,
            global_popularity_score: 5.0,
            created_at: now - Duration::hours(2),
            updated_at: now - Duration::hours(1),
            is_active: true,
        });

        self.insert_video(Video {
            tenant_id: tenant_id.to_string(),
            video_id: "vid_cooking_1".to_string(),
            playback_url: "https://cdn.example.com/v/vid_cooking.m3u8".to_string(),
            thumbnail_url: None,
            title: "Cooking pasta".to_string(),
            main_tag: "cooking".to_string(),
            tags: vec!["cooking".to_string()],
            duration_seconds: 30,
            maturity_rating: "PG".to_string(),
            editorial_boost: 0.0,
            global_popularity_score: 20.0,
            created_at: now - Duration::hours(2),
            updated_at: now - Duration::hours(1),
            is_active: true,
        });

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

        self.insert_user_signals(UserSignals {
            tenant_id: tenant_id.to_string(),
            user_hash: "user_hash_123".to_string(),
            category_stats,
            total_views_last7d: 10,
            total_watch_time_last7d_ms: 130_000,
            skip_rate_last7d: 0.1,
            last_active_at: now - Duration::hours(2),
            updated_at: now - Duration::hours(1),
        });
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

#[async_trait]
impl TenantConfigRepository for InMemoryStore {
    async fn get_by_tenant_and_api_key(
        &self,
        tenant_id: &str,
        api_key: &str,
    ) -> Result<Option<TenantConfig>> {
        Ok(self
            .tenants
            .get(tenant_id)
            .filter(|t| t.api_key == api_key)
            .map(|t| t.value().clone()))
    }

    async fn set_personalization(
        &self,
        tenant_id: &str,
        api_key: &str,
        enable: bool,
    ) -> Result<()> {
        if let Some(mut tenant) = self.tenants.get_mut(tenant_id) {
            if tenant.api_key == api_key {
                tenant.use_personalization = enable;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SystemConfigRepository for InMemoryStore {
    async fn is_personalization_globally_enabled(&self) -> Result<bool> {
        Ok(self.personalization_enabled.load(Ordering::Relaxed))
    }
}

#[async_trait]
impl UserSignalsRepository for InMemoryStore {
    async fn get_by_tenant_and_user_hash(
        &self,
        tenant_id: &str,
        user_hash: &str,
    ) -> Result<Option<UserSignals>> {
        Ok(self
            .user_signals
            .get(&(tenant_id.to_string(), user_hash.to_string()))
            .map(|s| s.value().clone()))
    }

    async fn save(&self, signals: UserSignals) -> Result<()> {
        self.user_signals.insert(
            (signals.tenant_id.clone(), signals.user_hash.clone()),
            signals,
        );
        Ok(())
    }
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn get_candidate_videos(
        &self,
        tenant_id: &str,
        max_count: i32,
        maturity_policy: &str,
    ) -> Result<Vec<Video>> {
        let mut candidates: Vec<Video> = self
            .videos
            .iter()
            .filter(|entry| {
                let v = entry.value();
                v.tenant_id == tenant_id
                    && v.is_active
                    && maturity::is_allowed(&v.maturity_rating, maturity_policy)
            })
            .map(|entry| entry.value().clone())
            .collect();

        candidates.sort_by(|a, b| {
            b.global_popularity_score
                .partial_cmp(&a.global_popularity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        candidates.truncate(max_count.max(0) as usize);

        Ok(candidates)
    }

    async fn get_by_ids(&self, tenant_id: &str, video_ids: &[String]) -> Result<Vec<Video>> {
        let id_set: HashSet<&String> = video_ids.iter().collect();

        Ok(self
            .videos
            .iter()
            .filter(|entry| {
                let v = entry.value();
                v.tenant_id == tenant_id && id_set.contains(&v.video_id)
            })
            .map(|entry| entry.value().clone())
            .collect())
    }
}
