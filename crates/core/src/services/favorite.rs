//! Favorite (bookmark) service.

use chrono::Utc;
use sea_orm::Set;
use transitionflow_common::{AppError, AppResult, IdGenerator};
use transitionflow_db::{
    entities::{favorite, transition},
    repositories::{FavoriteRepository, TransitionRepository},
};

/// Favorite service for managing bookmarks.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    transition_repo: TransitionRepository,
    id_gen: IdGenerator,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(
        favorite_repo: FavoriteRepository,
        transition_repo: TransitionRepository,
    ) -> Self {
        Self {
            favorite_repo,
            transition_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a transition to favorites.
    pub async fn create(&self, account_id: &str, transition_id: &str) -> AppResult<favorite::Model> {
        // Check if transition exists
        self.transition_repo.get_by_id(transition_id).await?;

        // At most one row per (account, transition) pair
        if self
            .favorite_repo
            .is_favorited(account_id, transition_id)
            .await?
        {
            return Err(AppError::Conflict(
                "Transition already favorited".to_string(),
            ));
        }

        let model = favorite::ActiveModel {
            id: Set(self.id_gen.generate()),
            account_id: Set(account_id.to_string()),
            transition_id: Set(transition_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        self.favorite_repo.create(model).await
    }

    /// Remove a transition from favorites.
    pub async fn delete(&self, account_id: &str, transition_id: &str) -> AppResult<()> {
        if !self
            .favorite_repo
            .is_favorited(account_id, transition_id)
            .await?
        {
            return Err(AppError::NotFound("Favorite not found".to_string()));
        }

        self.favorite_repo
            .delete_by_account_and_transition(account_id, transition_id)
            .await
    }

    /// Check if a transition is favorited by an account.
    pub async fn is_favorited(&self, account_id: &str, transition_id: &str) -> AppResult<bool> {
        self.favorite_repo
            .is_favorited(account_id, transition_id)
            .await
    }

    /// Get an account's favorited transitions, most recently favorited
    /// first (paginated by favorite id).
    pub async fn list_transitions(
        &self,
        account_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<transition::Model>> {
        let favorites = self
            .favorite_repo
            .find_by_account(account_id, limit, until_id)
            .await?;

        let ids: Vec<String> = favorites.iter().map(|f| f.transition_id.clone()).collect();
        let transitions = self.transition_repo.find_by_ids(&ids).await?;

        // Preserve favorite order; a favorite pointing at a deleted
        // transition is silently skipped
        let ordered = favorites
            .iter()
            .filter_map(|f| {
                transitions
                    .iter()
                    .find(|t| t.id == f.transition_id)
                    .cloned()
            })
            .collect();

        Ok(ordered)
    }

    /// Count an account's favorites.
    pub async fn count(&self, account_id: &str) -> AppResult<u64> {
        self.favorite_repo.count_by_account(account_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_transition(id: &str) -> transition::Model {
        transition::Model {
            id: id.to_string(),
            account_id: "owner".to_string(),
            track1_id: "t1".to_string(),
            track1_name: "Midnight City".to_string(),
            track1_artist: "M83".to_string(),
            track1_image: None,
            track2_id: "t2".to_string(),
            track2_name: "Reunion".to_string(),
            track2_artist: "M83".to_string(),
            track2_image: None,
            crossfade_seconds: 6,
            description: None,
            tags: json!([]),
            views_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_favorite(id: &str, account_id: &str, transition_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            account_id: account_id.to_string(),
            transition_id: transition_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(favorite_db: MockDatabase, transition_db: MockDatabase) -> FavoriteService {
        FavoriteService::new(
            FavoriteRepository::new(Arc::new(favorite_db.into_connection())),
            TransitionRepository::new(Arc::new(transition_db.into_connection())),
        )
    }

    #[tokio::test]
    async fn test_create_already_favorited() {
        let favorite_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_favorite("f1", "a1", "tr1")]]);
        let transition_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_transition("tr1")]]);

        let service = service(favorite_db, transition_db);
        let result = service.create("a1", "tr1").await;

        match result {
            Err(AppError::Conflict(_)) => {}
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_create_transition_not_found() {
        let favorite_db = MockDatabase::new(DatabaseBackend::Postgres);
        let transition_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transition::Model>::new()]);

        let service = service(favorite_db, transition_db);
        let result = service.create("a1", "missing").await;

        match result {
            Err(AppError::TransitionNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected TransitionNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_delete_not_favorited() {
        let favorite_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<favorite::Model>::new()]);
        let transition_db = MockDatabase::new(DatabaseBackend::Postgres);

        let service = service(favorite_db, transition_db);
        let result = service.delete("a1", "tr1").await;

        match result {
            Err(AppError::NotFound(_)) => {}
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_list_transitions_preserves_favorite_order() {
        let f1 = create_test_favorite("f2", "a1", "tr_b");
        let f2 = create_test_favorite("f1", "a1", "tr_a");
        let t_a = create_test_transition("tr_a");
        let t_b = create_test_transition("tr_b");

        let favorite_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[f1, f2]]);
        // find_by_ids returns in arbitrary (here: id) order
        let transition_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[t_a, t_b]]);

        let service = service(favorite_db, transition_db);
        let result = service.list_transitions("a1", 10, None).await.unwrap();

        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr_b", "tr_a"]);
    }

    #[tokio::test]
    async fn test_list_transitions_skips_dangling_favorites() {
        let f1 = create_test_favorite("f1", "a1", "tr_gone");
        let favorite_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[f1]]);
        let transition_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transition::Model>::new()]);

        let service = service(favorite_db, transition_db);
        let result = service.list_transitions("a1", 10, None).await.unwrap();

        assert!(result.is_empty());
    }
}
