//! Transition service: submission, lookup, listing.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::services::rating::{self, RatingTally};
use transitionflow_common::{AppError, AppResult, IdGenerator};
use transitionflow_db::{
    entities::transition,
    repositories::{RatingRepository, TransitionRepository},
};

/// One track slot of a submission.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackInput {
    /// Catalog id of the track.
    #[validate(length(min = 1, message = "track id is required"))]
    pub id: String,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1, max = 256))]
    pub artist: String,
    pub image: Option<String>,
}

/// Input for submitting a transition.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransitionInput {
    #[validate(nested)]
    pub track1: TrackInput,
    #[validate(nested)]
    pub track2: TrackInput,
    /// Suggested crossfade length in seconds.
    #[validate(range(min = 1, max = 15, message = "crossfade must be 1-15 seconds"))]
    pub crossfade_seconds: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A transition together with its recomputed tally.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionWithTally {
    #[serde(flatten)]
    pub transition: transition::Model,
    pub tally: RatingTally,
}

/// Transition service for business logic.
#[derive(Clone)]
pub struct TransitionService {
    transition_repo: TransitionRepository,
    rating_repo: RatingRepository,
    id_gen: IdGenerator,
}

impl TransitionService {
    /// Create a new transition service.
    #[must_use]
    pub const fn new(transition_repo: TransitionRepository, rating_repo: RatingRepository) -> Self {
        Self {
            transition_repo,
            rating_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new transition.
    ///
    /// Both tracks and the crossfade bound are validated; the row is
    /// immutable after creation except for its view counter.
    pub async fn create(
        &self,
        account_id: &str,
        input: CreateTransitionInput,
    ) -> AppResult<transition::Model> {
        input.validate()?;

        let model = transition::ActiveModel {
            id: Set(self.id_gen.generate()),
            account_id: Set(account_id.to_string()),
            track1_id: Set(input.track1.id),
            track1_name: Set(input.track1.name),
            track1_artist: Set(input.track1.artist),
            track1_image: Set(input.track1.image),
            track2_id: Set(input.track2.id),
            track2_name: Set(input.track2.name),
            track2_artist: Set(input.track2.artist),
            track2_image: Set(input.track2.image),
            crossfade_seconds: Set(input.crossfade_seconds),
            description: Set(input.description),
            tags: Set(json!(input.tags)),
            views_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        self.transition_repo.create(model).await
    }

    /// Get a transition by id, with the distinct not-found error.
    pub async fn get(&self, id: &str) -> AppResult<transition::Model> {
        self.transition_repo.get_by_id(id).await
    }

    /// Get a transition with its tally.
    ///
    /// The primary fetch decides the outcome; a failing ratings fetch
    /// degrades to a zeroed tally rather than failing the view.
    pub async fn get_with_tally(&self, id: &str) -> AppResult<TransitionWithTally> {
        let transition = self.transition_repo.get_by_id(id).await?;

        let tally = match self.rating_repo.find_by_transition(id).await {
            Ok(ratings) => rating::tally(&ratings),
            Err(e) => {
                tracing::warn!(error = %e, transition_id = %id, "Ratings fetch failed, rendering zeroed tally");
                RatingTally::default()
            }
        };

        Ok(TransitionWithTally { transition, tally })
    }

    /// Recent transitions with tallies (paginated).
    pub async fn list_recent(
        &self,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<TransitionWithTally>> {
        let transitions = self.transition_repo.find_recent(limit, until_id).await?;
        Ok(self.attach_tallies(transitions).await)
    }

    /// An account's transitions with tallies (paginated).
    pub async fn list_by_account(
        &self,
        account_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<TransitionWithTally>> {
        let transitions = self
            .transition_repo
            .find_by_account(account_id, limit, until_id)
            .await?;
        Ok(self.attach_tallies(transitions).await)
    }

    /// Delete a transition. Only the owner may delete.
    pub async fn delete(&self, account_id: &str, id: &str) -> AppResult<()> {
        let transition = self.transition_repo.get_by_id(id).await?;
        if transition.account_id != account_id {
            return Err(AppError::Forbidden(
                "Only the owner can delete a transition".to_string(),
            ));
        }
        self.transition_repo.delete(id).await
    }

    /// Attach tallies to a batch of transitions with one ratings query.
    ///
    /// A failing ratings fetch degrades every tally to zero instead of
    /// failing the listing.
    pub async fn attach_tallies(
        &self,
        transitions: Vec<transition::Model>,
    ) -> Vec<TransitionWithTally> {
        let ids: Vec<String> = transitions.iter().map(|t| t.id.clone()).collect();

        let ratings = match self.rating_repo.find_by_transitions(&ids).await {
            Ok(ratings) => ratings,
            Err(e) => {
                tracing::warn!(error = %e, "Batch ratings fetch failed, rendering zeroed tallies");
                Vec::new()
            }
        };

        transitions
            .into_iter()
            .map(|t| {
                let own: Vec<_> = ratings
                    .iter()
                    .filter(|r| r.transition_id == t.id)
                    .cloned()
                    .collect();
                TransitionWithTally {
                    tally: rating::tally(&own),
                    transition: t,
                }
            })
            .collect()
    }
}
