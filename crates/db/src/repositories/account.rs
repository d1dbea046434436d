//! Account repository.

use std::sync::Arc;

use crate::entities::{Account, account};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use transitionflow_common::{AppError, AppResult};

/// Account repository for database operations.
#[derive(Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<account::Model>> {
        Account::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an account by ID, or fail with `AccountNotFound`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<account::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    /// Find an account by the identity provider's subject id.
    pub async fn find_by_provider_id(
        &self,
        provider_id: &str,
    ) -> AppResult<Option<account::Model>> {
        Account::find()
            .filter(account::Column::ProviderId.eq(provider_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by session token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<account::Model>> {
        Account::find()
            .filter(account::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new account.
    pub async fn create(&self, model: account::ActiveModel) -> AppResult<account::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an account.
    pub async fn update(&self, model: account::ActiveModel) -> AppResult<account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_account(id: &str, username: &str) -> account::Model {
        account::Model {
            id: id.to_string(),
            provider_id: format!("prov-{id}"),
            username: username.to_string(),
            display_name: None,
            avatar_url: None,
            token: Some(format!("token-{id}")),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let account = create_test_account("a1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account.clone()]])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.find_by_id("a1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<account::Model>::new()])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::AccountNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected AccountNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_token() {
        let account = create_test_account("a1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account.clone()]])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.find_by_token("token-a1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "a1");
    }

    #[tokio::test]
    async fn test_find_by_provider_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<account::Model>::new()])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.find_by_provider_id("nobody").await.unwrap();

        assert!(result.is_none());
    }
}
