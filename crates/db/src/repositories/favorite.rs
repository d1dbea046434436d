//! Favorite repository.

use std::sync::Arc;

use crate::entities::{Favorite, favorite};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use transitionflow_common::{AppError, AppResult};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a favorite by account and transition.
    pub async fn find_by_account_and_transition(
        &self,
        account_id: &str,
        transition_id: &str,
    ) -> AppResult<Option<favorite::Model>> {
        Favorite::find()
            .filter(favorite::Column::AccountId.eq(account_id))
            .filter(favorite::Column::TransitionId.eq(transition_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if an account has favorited a transition.
    pub async fn is_favorited(&self, account_id: &str, transition_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_account_and_transition(account_id, transition_id)
            .await?
            .is_some())
    }

    /// Create a new favorite.
    pub async fn create(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a favorite by account and transition.
    pub async fn delete_by_account_and_transition(
        &self,
        account_id: &str,
        transition_id: &str,
    ) -> AppResult<()> {
        Favorite::delete_many()
            .filter(favorite::Column::AccountId.eq(account_id))
            .filter(favorite::Column::TransitionId.eq(transition_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get an account's favorites (paginated).
    pub async fn find_by_account(
        &self,
        account_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<favorite::Model>> {
        let mut query = Favorite::find()
            .filter(favorite::Column::AccountId.eq(account_id))
            .order_by_desc(favorite::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(favorite::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count an account's favorites.
    pub async fn count_by_account(&self, account_id: &str) -> AppResult<u64> {
        Favorite::find()
            .filter(favorite::Column::AccountId.eq(account_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_favorite(id: &str, account_id: &str, transition_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            account_id: account_id.to_string(),
            transition_id: transition_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_favorited_true() {
        let fav = create_test_favorite("f1", "a1", "tr1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fav]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.is_favorited("a1", "tr1").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_is_favorited_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<favorite::Model>::new()])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.is_favorited("a1", "tr1").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_delete_by_account_and_transition() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.delete_by_account_and_transition("a1", "tr1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_find_by_account() {
        let f1 = create_test_favorite("f2", "a1", "tr2");
        let f2 = create_test_favorite("f1", "a1", "tr1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.find_by_account("a1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
