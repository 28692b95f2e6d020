//! Abstract collaborators the engine depends on.
//!
//! Persistence, tenant lookup, and candidate retrieval live behind these
//! traits; the engine treats them as opaque. `storage::InMemoryStore`
//! implements all of them for local runs and tests.

use crate::models::{TenantConfig, UserSignals, Video};
use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TenantConfigRepository: Send + Sync {
    /// Resolves a tenant by id and API key; `None` means unknown tenant or
    /// bad credential.
    async fn get_by_tenant_and_api_key(
        &self,
        tenant_id: &str,
        api_key: &str,
    ) -> Result<Option<TenantConfig>>;

    async fn set_personalization(
        &self,
        tenant_id: &str,
        api_key: &str,
        enable: bool,
    ) -> Result<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SystemConfigRepository: Send + Sync {
    /// Process-wide personalization kill-switch, ANDed with the tenant flag.
    async fn is_personalization_globally_enabled(&self) -> Result<bool>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserSignalsRepository: Send + Sync {
    async fn get_by_tenant_and_user_hash(
        &self,
        tenant_id: &str,
        user_hash: &str,
    ) -> Result<Option<UserSignals>>;

    /// Replaces the stored snapshot wholesale (last writer wins).
    async fn save(&self, signals: UserSignals) -> Result<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Active candidates under the tenant's maturity ceiling, ordered by
    /// popularity then recency.
    async fn get_candidate_videos(
        &self,
        tenant_id: &str,
        max_count: i32,
        maturity_policy: &str,
    ) -> Result<Vec<Video>>;

    /// Bulk lookup used by ingestion to resolve event video ids to tags.
    /// Ids that no longer resolve are simply absent from the result.
    async fn get_by_ids(&self, tenant_id: &str, video_ids: &[String]) -> Result<Vec<Video>>;
}
