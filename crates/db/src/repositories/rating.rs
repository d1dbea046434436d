//! Rating repository.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use transitionflow_common::{AppError, AppResult};

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a rating by account and transition.
    pub async fn find_by_account_and_transition(
        &self,
        account_id: &str,
        transition_id: &str,
    ) -> AppResult<Option<rating::Model>> {
        Rating::find()
            .filter(rating::Column::AccountId.eq(account_id))
            .filter(rating::Column::TransitionId.eq(transition_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert or replace the rating for an (account, transition) pair.
    ///
    /// Single conditional statement on the unique pair index: an existing
    /// row has its value replaced, otherwise the row is inserted. This is
    /// the only write path for the voted states.
    pub async fn upsert(&self, model: rating::ActiveModel) -> AppResult<rating::Model> {
        Rating::insert(model)
            .on_conflict(
                OnConflict::columns([rating::Column::AccountId, rating::Column::TransitionId])
                    .update_columns([rating::Column::Value, rating::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the rating for an (account, transition) pair.
    ///
    /// Single statement, keyed the same way as the upsert; the retraction
    /// path of the vote state machine.
    pub async fn delete_by_account_and_transition(
        &self,
        account_id: &str,
        transition_id: &str,
    ) -> AppResult<()> {
        Rating::delete_many()
            .filter(rating::Column::AccountId.eq(account_id))
            .filter(rating::Column::TransitionId.eq(transition_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all ratings on a transition.
    pub async fn find_by_transition(&self, transition_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::TransitionId.eq(transition_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all ratings on a set of transitions (for batch tallies).
    pub async fn find_by_transitions(
        &self,
        transition_ids: &[String],
    ) -> AppResult<Vec<rating::Model>> {
        if transition_ids.is_empty() {
            return Ok(Vec::new());
        }
        Rating::find()
            .filter(rating::Column::TransitionId.is_in(transition_ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all ratings cast by an account, newest first.
    pub async fn find_by_account(&self, account_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::AccountId.eq(account_id))
            .order_by_desc(rating::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an account's upvotes (the recommendation preference signal).
    pub async fn find_upvotes_by_account(&self, account_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::AccountId.eq(account_id))
            .filter(rating::Column::Value.gt(0))
            .order_by_desc(rating::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count ratings cast by an account.
    pub async fn count_by_account(&self, account_id: &str) -> AppResult<u64> {
        Rating::find()
            .filter(rating::Column::AccountId.eq(account_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
