//! Transition repository.

use std::sync::Arc;

use crate::entities::{Transition, transition};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use transitionflow_common::{AppError, AppResult};

/// Transition repository for database operations.
#[derive(Clone)]
pub struct TransitionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransitionRepository {
    /// Create a new transition repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a transition by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<transition::Model>> {
        Transition::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a transition by ID, or fail with `TransitionNotFound`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<transition::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TransitionNotFound(id.to_string()))
    }

    /// Find transitions by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<transition::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Transition::find()
            .filter(transition::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new transition.
    pub async fn create(&self, model: transition::ActiveModel) -> AppResult<transition::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a transition.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let transition = self.find_by_id(id).await?;
        if let Some(t) = transition {
            t.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get recent transitions (paginated).
    ///
    /// IDs are ULIDs, so id order is creation order; `until_id` gives
    /// stable keyset pagination.
    pub async fn find_recent(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<transition::Model>> {
        let mut query = Transition::find().order_by_desc(transition::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(transition::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an account's transitions (paginated).
    pub async fn find_by_account(
        &self,
        account_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<transition::Model>> {
        let mut query = Transition::find()
            .filter(transition::Column::AccountId.eq(account_id))
            .order_by_desc(transition::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(transition::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all of an account's transitions (for stats and achievements).
    pub async fn find_all_by_account(&self, account_id: &str) -> AppResult<Vec<transition::Model>> {
        Transition::find()
            .filter(transition::Column::AccountId.eq(account_id))
            .order_by_desc(transition::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count an account's transitions.
    pub async fn count_by_account(&self, account_id: &str) -> AppResult<u64> {
        Transition::find()
            .filter(transition::Column::AccountId.eq(account_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment view count atomically (single UPDATE query, no fetch).
    pub async fn increment_views_count(&self, transition_id: &str) -> AppResult<()> {
        Transition::update_many()
            .col_expr(
                transition::Column::ViewsCount,
                Expr::col(transition::Column::ViewsCount).add(1),
            )
            .filter(transition::Column::Id.eq(transition_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
