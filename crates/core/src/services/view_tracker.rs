//! View tracker: best-effort view counting.

use transitionflow_db::repositories::TransitionRepository;

/// Records transition views.
///
/// Every detail render counts as a view; there is no deduplication by
/// viewer. Failures are logged and swallowed so the primary read path is
/// never blocked or failed by view tracking.
#[derive(Clone)]
pub struct ViewTrackerService {
    transition_repo: TransitionRepository,
}

impl ViewTrackerService {
    /// Create a new view tracker service.
    #[must_use]
    pub const fn new(transition_repo: TransitionRepository) -> Self {
        Self { transition_repo }
    }

    /// Record one view of a transition.
    ///
    /// Single atomic increment; infallible from the caller's perspective.
    pub async fn record_view(&self, transition_id: &str) {
        if let Err(e) = self
            .transition_repo
            .increment_views_count(transition_id)
            .await
        {
            tracing::warn!(error = %e, transition_id = %transition_id, "Failed to record view");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_view_increments() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = ViewTrackerService::new(TransitionRepository::new(db));
        service.record_view("tr1").await;
    }

    #[tokio::test]
    async fn test_record_view_swallows_errors() {
        // Mock with no prepared exec results: the increment errors, and
        // record_view must still return without panicking
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ViewTrackerService::new(TransitionRepository::new(db));
        service.record_view("tr1").await;
    }
}
