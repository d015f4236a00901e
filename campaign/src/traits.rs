//! Trait definitions with mockall annotations for testing
//!
//! These are the capability contracts the orchestrator is injected with.
//! The engine never depends on a concrete browser driver, storage backend,
//! completion endpoint or dashboard transport, only on these traits.

use std::time::Duration;

use crate::error::{CampaignResult, StoreResult};
use shared::{
    CampaignStatus, CandidateItem, CompletionFailure, EngagementRecord, SessionStats, Source,
};

/// The external interaction surface the campaign acts through.
///
/// One stateful session per orchestrator; must not be driven concurrently.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ActionSurface: Send + Sync {
    /// Bring the surface to the given location
    async fn navigate_to(&self, url: &str) -> CampaignResult<()>;

    /// Fetch the currently visible candidate set for a source (bounded)
    async fn find_candidates(&self, source: &Source) -> CampaignResult<Vec<CandidateItem>>;

    /// Submit reply text for an item; `Ok` means the surface confirmed it
    async fn submit_reply(&self, item_id: &str, text: &str) -> CampaignResult<()>;

    /// Best-effort cleanup of any open compose surface after a failure
    async fn dismiss_composer(&self) -> CampaignResult<()>;

    /// Follow an author (hunting-mode follow-up, best effort)
    async fn follow_author(&self, author: &str) -> CampaignResult<()>;

    async fn is_authenticated(&self) -> bool;

    /// Block until the session is authenticated, bounded by `timeout`
    async fn await_authentication(&self, timeout: Duration) -> CampaignResult<()>;
}

// Shared handles drive the same session; useful when a caller wants to keep
// inspecting the surface it handed to the orchestrator.
#[async_trait::async_trait]
impl<T: ActionSurface + ?Sized> ActionSurface for std::sync::Arc<T> {
    async fn navigate_to(&self, url: &str) -> CampaignResult<()> {
        (**self).navigate_to(url).await
    }

    async fn find_candidates(&self, source: &Source) -> CampaignResult<Vec<CandidateItem>> {
        (**self).find_candidates(source).await
    }

    async fn submit_reply(&self, item_id: &str, text: &str) -> CampaignResult<()> {
        (**self).submit_reply(item_id, text).await
    }

    async fn dismiss_composer(&self) -> CampaignResult<()> {
        (**self).dismiss_composer().await
    }

    async fn follow_author(&self, author: &str) -> CampaignResult<()> {
        (**self).follow_author(author).await
    }

    async fn is_authenticated(&self) -> bool {
        (**self).is_authenticated().await
    }

    async fn await_authentication(&self, timeout: Duration) -> CampaignResult<()> {
        (**self).await_authentication(timeout).await
    }
}

/// Durable record of every action taken, keyed by item id and by day.
///
/// The only persistent shared state in the system. `record` must enforce
/// create-if-absent semantics so a stats reader can poll concurrently
/// without orchestrator-owned locks.
#[mockall::automock]
#[async_trait::async_trait]
pub trait EngagementStore: Send + Sync {
    /// Has any record ever been created for this id?
    async fn has_acted(&self, id: &str) -> StoreResult<bool>;

    /// Create the record; fails with `StoreError::DuplicateId` if one exists
    async fn record(&self, entry: EngagementRecord) -> StoreResult<()>;

    /// Count of records with today's UTC date key
    async fn count_today(&self) -> StoreResult<u64>;

    async fn stats(&self) -> StoreResult<SessionStats>;

    /// Cheap liveness probe, used to flag degraded periods
    async fn health_check(&self) -> bool;
}

// A stats reader (dashboard poller) and the orchestrator can share one
// store handle; the store's own create-if-absent semantics make that safe.
#[async_trait::async_trait]
impl<T: EngagementStore + ?Sized> EngagementStore for std::sync::Arc<T> {
    async fn has_acted(&self, id: &str) -> StoreResult<bool> {
        (**self).has_acted(id).await
    }

    async fn record(&self, entry: EngagementRecord) -> StoreResult<()> {
        (**self).record(entry).await
    }

    async fn count_today(&self) -> StoreResult<u64> {
        (**self).count_today().await
    }

    async fn stats(&self) -> StoreResult<SessionStats> {
        (**self).stats().await
    }

    async fn health_check(&self) -> bool {
        (**self).health_check().await
    }
}

/// Remote text-generation call
#[mockall::automock]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionFailure>;
}

/// One-way, best-effort event emission to an external observer.
///
/// Must never block or fail the campaign loop; implementations queue and
/// drop rather than wait.
#[mockall::automock]
pub trait Notifier: Send + Sync {
    fn log_line(&self, message: &str);

    fn status(&self, status: CampaignStatus);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_trait_instantiation() {
        let _surface = MockActionSurface::new();
        let _store = MockEngagementStore::new();
        let _client = MockCompletionClient::new();
        let _notifier = MockNotifier::new();
    }
}
