pub mod config;
pub mod jobs;
pub mod messaging;
pub mod models;
pub mod repositories;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use services::{
    FeatureExtractor, FeedDiversifier, FeedService, Ranker, UserEventIngestionService,
};
