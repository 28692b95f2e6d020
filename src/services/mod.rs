pub mod diversity;
pub mod features;
pub mod feed;
pub mod ingestion;
pub mod ranking;

pub use diversity::FeedDiversifier;
pub use features::FeatureExtractor;
pub use feed::FeedService;
pub use ingestion::UserEventIngestionService;
pub use ranking::Ranker;
