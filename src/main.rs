use std::sync::Arc;

use feed_ranking_service::jobs::UserEventsWorker;
use feed_ranking_service::messaging::InMemoryUserEventQueue;
use feed_ranking_service::models::FeedRequest;
use feed_ranking_service::storage::InMemoryStore;
use feed_ranking_service::{
    Config, FeatureExtractor, FeedDiversifier, FeedService, Ranker, UserEventIngestionService,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env().expect("Failed to load config");

    info!("Starting {}", config.service.service_name);

    // Seeded in-memory store stands in for the real repositories
    let store = Arc::new(InMemoryStore::seeded());

    let ranker = Ranker::new(
        FeatureExtractor::new(),
        FeedDiversifier::new(
            config.diversity.max_title_similarity,
            config.diversity.max_same_main_tag_in_row,
        ),
    );

    let feed_service = FeedService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        ranker,
        config.feed.clone(),
    );

    let ingestion = Arc::new(UserEventIngestionService::new(store.clone(), store.clone()));
    let queue = Arc::new(InMemoryUserEventQueue::new());

    let worker = UserEventsWorker::new(queue.clone(), ingestion);
    let worker_handle = tokio::spawn(worker.run());

    // Smoke request against the seed data so a fresh checkout shows the
    // engine working end to end
    let demo = feed_service
        .get_feed(&FeedRequest {
            tenant_id: "tenant_1".to_string(),
            api_key: "secret-api-key".to_string(),
            user_hash: "user_hash_123".to_string(),
            limit: Some(5),
        })
        .await?;

    info!(mode = ?demo.mode, item_count = demo.items.len(), "seed feed ranked");
    for item in &demo.items {
        info!(
            rank = item.rank,
            video_id = %item.video.video_id,
            score = item.score,
            "feed item"
        );
    }

    info!("ready; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutdown signal received");
    worker_handle.abort();

    Ok(())
}
