use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub feed: FeedConfig,
    pub diversity: DiversityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Hard ceiling on the per-request result size.
    pub max_limit: i32,
    /// Candidates fetched from the video store per ranking request.
    pub candidate_pool_size: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiversityConfig {
    pub max_title_similarity: f64,
    pub max_same_main_tag_in_row: i32,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "feed-ranking-service".to_string()),
            },
            feed: FeedConfig {
                max_limit: env::var("FEED_MAX_LIMIT")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .expect("FEED_MAX_LIMIT must be a valid i32"),
                candidate_pool_size: env::var("FEED_CANDIDATE_POOL_SIZE")
                    .unwrap_or_else(|_| "200".to_string())
                    .parse()
                    .expect("FEED_CANDIDATE_POOL_SIZE must be a valid i32"),
            },
            diversity: DiversityConfig {
                max_title_similarity: env::var("DIVERSITY_MAX_TITLE_SIMILARITY")
                    .unwrap_or_else(|_| "0.8".to_string())
                    .parse()
                    .expect("DIVERSITY_MAX_TITLE_SIMILARITY must be a valid f64"),
                max_same_main_tag_in_row: env::var("DIVERSITY_MAX_SAME_TAG_IN_ROW")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .expect("DIVERSITY_MAX_SAME_TAG_IN_ROW must be a valid i32"),
            },
        })
    }
}
