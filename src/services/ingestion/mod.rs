// ============================================
// Signal Aggregation Module
// ============================================
// Folds batches of raw interaction events into the rolling per-user
// aggregate the feature extractor consumes on the next ranking request.

use crate::models::{UserEvent, UserEventBatch, UserEventType, UserSignals};
use crate::repositories::{UserSignalsRepository, VideoRepository};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Folds `events` into a new aggregate snapshot derived from `existing`.
///
/// Pure: the existing snapshot is never mutated, and the caller supplies
/// both the resolved tag mapping and the `updated_at` instant. Events whose
/// video id is missing from `main_tag_by_video` are dropped. Per-category
/// effects are commutative sums and `last_active_at` is a max, so the fold
/// is order-independent and safe on unsorted batches.
pub fn fold_events(
    tenant_id: &str,
    user_hash: &str,
    events: &[UserEvent],
    existing: Option<&UserSignals>,
    main_tag_by_video: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> UserSignals {
    let mut next = existing
        .cloned()
        .unwrap_or_else(|| UserSignals::empty(tenant_id, user_hash));

    for event in events {
        let Some(main_tag) = main_tag_by_video.get(&event.video_id) else {
            continue;
        };

        let stats = next.category_stats.entry(main_tag.clone()).or_default();

        match event.event_type {
            UserEventType::VideoView => {
                stats.views += 1;
                stats.watch_time_ms += event.watch_time_ms.unwrap_or(0);
            }
            UserEventType::Skip => {
                stats.skips += 1;
            }
            // recorded for future use; no numeric effect on the aggregate
            UserEventType::Like | UserEventType::Share => {}
        }

        if event.timestamp > next.last_active_at {
            next.last_active_at = event.timestamp;
        }
    }

    let total_views: i64 = next.category_stats.values().map(|s| s.views).sum();
    let total_watch_time: i64 = next.category_stats.values().map(|s| s.watch_time_ms).sum();
    let total_skips: i64 = next.category_stats.values().map(|s| s.skips).sum();

    next.total_views_last7d = total_views;
    next.total_watch_time_last7d_ms = total_watch_time;
    next.skip_rate_last7d = if total_views == 0 {
        0.0
    } else {
        total_skips as f64 / total_views as f64
    };
    next.updated_at = now;

    next
}

/// Ingestion entry point shared by the inline request path and the queue
/// worker. Callers provide at-least-once delivery; duplicate delivery of
/// the same batch inflates counters, so dedupe belongs at the transport
/// edge.
///
/// Concurrent ingestion for the same user is a read-modify-write over the
/// stored snapshot; the caller serializes per-user batches.
pub struct UserEventIngestionService {
    user_signals: Arc<dyn UserSignalsRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl UserEventIngestionService {
    pub fn new(
        user_signals: Arc<dyn UserSignalsRepository>,
        videos: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            user_signals,
            videos,
        }
    }

    pub async fn ingest(
        &self,
        tenant_id: &str,
        user_hash: &str,
        events: &[UserEvent],
    ) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let existing = self
            .user_signals
            .get_by_tenant_and_user_hash(tenant_id, user_hash)
            .await?;

        let mut seen = HashSet::new();
        let distinct_ids: Vec<String> = events
            .iter()
            .filter(|e| seen.insert(e.video_id.as_str()))
            .map(|e| e.video_id.clone())
            .collect();

        let videos = self.videos.get_by_ids(tenant_id, &distinct_ids).await?;
        let main_tag_by_video: HashMap<String, String> = videos
            .into_iter()
            .map(|v| (v.video_id, v.main_tag))
            .collect();

        let dropped = events
            .iter()
            .filter(|e| !main_tag_by_video.contains_key(&e.video_id))
            .count();
        if dropped > 0 {
            // the video may have been deleted or deactivated since the event
            debug!(tenant_id, user_hash, dropped, "dropping events with unresolvable video ids");
        }

        let updated = fold_events(
            tenant_id,
            user_hash,
            events,
            existing.as_ref(),
            &main_tag_by_video,
            Utc::now(),
        );

        self.user_signals.save(updated).await?;

        Ok(())
    }

    pub async fn ingest_batch(&self, batch: &UserEventBatch) -> Result<()> {
        self.ingest(&batch.tenant_id, &batch.user_hash, &batch.events)
            .await
    }
}
