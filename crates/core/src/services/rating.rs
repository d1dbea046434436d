//! Rating service: vote tallying and the vote state machine.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use transitionflow_common::{AppResult, IdGenerator};
use transitionflow_db::{
    entities::rating,
    repositories::{RatingRepository, TransitionRepository},
};

/// Aggregated vote counts for a transition.
///
/// Never persisted; recomputed from rating rows on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingTally {
    pub upvotes: i32,
    pub downvotes: i32,
    /// `upvotes - downvotes`
    pub score: i32,
}

/// Tally a sequence of rating rows in a single pass.
///
/// Positive values count as upvotes, negative as downvotes; a zero value
/// means "no vote" and is excluded from both counts. Rows are not
/// deduplicated here — the unique (account, transition) index is the
/// upstream guarantee.
#[must_use]
pub fn tally(ratings: &[rating::Model]) -> RatingTally {
    let mut result = RatingTally::default();
    for r in ratings {
        if r.value > 0 {
            result.upvotes += 1;
        } else if r.value < 0 {
            result.downvotes += 1;
        }
    }
    result.score = result.upvotes - result.downvotes;
    result
}

/// A vote an account can cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// The stored rating value for this vote.
    #[must_use]
    pub const fn value(self) -> i16 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Interpret a signed rating value as a vote, if it is one.
    #[must_use]
    pub const fn from_value(value: i16) -> Option<Self> {
        if value > 0 {
            Some(Self::Up)
        } else if value < 0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// Vote state of one (account, transition) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoteState {
    Unrated,
    Upvoted,
    Downvoted,
}

impl VoteState {
    /// Apply a vote to the current state.
    ///
    /// Casting the vote the state already holds retracts it (toggle-off);
    /// any other vote moves to that vote's state.
    #[must_use]
    pub const fn apply(self, vote: Vote) -> Self {
        match (self, vote) {
            (Self::Upvoted, Vote::Up) | (Self::Downvoted, Vote::Down) => Self::Unrated,
            (_, Vote::Up) => Self::Upvoted,
            (_, Vote::Down) => Self::Downvoted,
        }
    }

    /// The state a stored rating row represents.
    #[must_use]
    pub fn from_rating(existing: Option<&rating::Model>) -> Self {
        match existing {
            Some(r) if r.value > 0 => Self::Upvoted,
            Some(r) if r.value < 0 => Self::Downvoted,
            _ => Self::Unrated,
        }
    }

    /// The stored rating value for this state, if any.
    #[must_use]
    pub const fn value(self) -> i16 {
        match self {
            Self::Unrated => 0,
            Self::Upvoted => 1,
            Self::Downvoted => -1,
        }
    }
}

/// Result of a vote submission.
///
/// Carries the state transition and the freshly recomputed tally so
/// callers can reconcile any optimistic display; on failure nothing is
/// returned and nothing was written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOutcome {
    pub previous: VoteState,
    pub current: VoteState,
    pub tally: RatingTally,
}

/// Rating service for business logic.
#[derive(Clone)]
pub struct RatingService {
    rating_repo: RatingRepository,
    transition_repo: TransitionRepository,
    id_gen: IdGenerator,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub const fn new(rating_repo: RatingRepository, transition_repo: TransitionRepository) -> Self {
        Self {
            rating_repo,
            transition_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a vote on a transition.
    ///
    /// Runs the vote state machine for the (account, transition) pair and
    /// executes the decision as exactly one storage action: a conditional
    /// upsert keyed by the unique pair index for the voted states, a
    /// keyed delete for the retraction.
    pub async fn rate(
        &self,
        account_id: &str,
        transition_id: &str,
        vote: Vote,
    ) -> AppResult<RateOutcome> {
        // The transition must exist; gives the distinct not-found error
        self.transition_repo.get_by_id(transition_id).await?;

        let existing = self
            .rating_repo
            .find_by_account_and_transition(account_id, transition_id)
            .await?;
        let previous = VoteState::from_rating(existing.as_ref());
        let current = previous.apply(vote);

        if current == VoteState::Unrated {
            self.rating_repo
                .delete_by_account_and_transition(account_id, transition_id)
                .await?;
        } else {
            let now = Utc::now();
            let model = rating::ActiveModel {
                id: Set(self.id_gen.generate()),
                account_id: Set(account_id.to_string()),
                transition_id: Set(transition_id.to_string()),
                value: Set(vote.value()),
                created_at: Set(now.into()),
                updated_at: Set(Some(now.into())),
            };
            self.rating_repo.upsert(model).await?;
        }

        let tally = self.tally_for(transition_id).await?;

        Ok(RateOutcome {
            previous,
            current,
            tally,
        })
    }

    /// Get an account's vote state for a transition.
    pub async fn vote_state(&self, account_id: &str, transition_id: &str) -> AppResult<VoteState> {
        let existing = self
            .rating_repo
            .find_by_account_and_transition(account_id, transition_id)
            .await?;
        Ok(VoteState::from_rating(existing.as_ref()))
    }

    /// Recompute the tally for a transition.
    pub async fn tally_for(&self, transition_id: &str) -> AppResult<RatingTally> {
        let ratings = self.rating_repo.find_by_transition(transition_id).await?;
        Ok(tally(&ratings))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;
    use transitionflow_common::AppError;
    use transitionflow_db::entities::transition;

    fn create_test_transition(id: &str, account_id: &str) -> transition::Model {
        transition::Model {
            id: id.to_string(),
            account_id: account_id.to_string(),
            track1_id: "t1".to_string(),
            track1_name: "Strobe".to_string(),
            track1_artist: "deadmau5".to_string(),
            track1_image: None,
            track2_id: "t2".to_string(),
            track2_name: "Ghosts 'n' Stuff".to_string(),
            track2_artist: "deadmau5".to_string(),
            track2_image: None,
            crossfade_seconds: 10,
            description: None,
            tags: json!([]),
            views_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_rating(id: &str, account_id: &str, transition_id: &str, value: i16) -> rating::Model {
        rating::Model {
            id: id.to_string(),
            account_id: account_id.to_string(),
            transition_id: transition_id.to_string(),
            value,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    // Tally laws (pure)

    #[test]
    fn test_tally_empty_is_zero() {
        let result = tally(&[]);
        assert_eq!(result, RatingTally::default());
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_tally_counts_and_score() {
        let ratings = vec![
            create_test_rating("r1", "a1", "tr1", 1),
            create_test_rating("r2", "a2", "tr1", 1),
            create_test_rating("r3", "a3", "tr1", -1),
        ];
        let result = tally(&ratings);
        assert_eq!(result.upvotes, 2);
        assert_eq!(result.downvotes, 1);
        assert_eq!(result.score, 1);
        assert_eq!(result.score, result.upvotes - result.downvotes);
    }

    #[test]
    fn test_tally_ignores_zero_values() {
        let ratings = vec![
            create_test_rating("r1", "a1", "tr1", 0),
            create_test_rating("r2", "a2", "tr1", 1),
        ];
        let result = tally(&ratings);
        assert_eq!(result.upvotes, 1);
        assert_eq!(result.downvotes, 0);
    }

    #[test]
    fn test_tally_does_not_deduplicate() {
        // Duplicates that slip past the unique index count as distinct votes
        let ratings = vec![
            create_test_rating("r1", "a1", "tr1", 1),
            create_test_rating("r2", "a1", "tr1", 1),
        ];
        let result = tally(&ratings);
        assert_eq!(result.upvotes, 2);
    }

    // State machine laws (pure)

    #[test]
    fn test_apply_toggle_law() {
        assert_eq!(
            VoteState::Unrated.apply(Vote::Up).apply(Vote::Up),
            VoteState::Unrated
        );
        assert_eq!(
            VoteState::Unrated.apply(Vote::Down).apply(Vote::Down),
            VoteState::Unrated
        );
    }

    #[test]
    fn test_apply_switch_vote() {
        assert_eq!(
            VoteState::Unrated.apply(Vote::Up).apply(Vote::Down),
            VoteState::Downvoted
        );
        assert_eq!(
            VoteState::Unrated.apply(Vote::Down).apply(Vote::Up),
            VoteState::Upvoted
        );
    }

    #[test]
    fn test_apply_from_unrated() {
        assert_eq!(VoteState::Unrated.apply(Vote::Up), VoteState::Upvoted);
        assert_eq!(VoteState::Unrated.apply(Vote::Down), VoteState::Downvoted);
    }

    #[test]
    fn test_vote_from_value() {
        assert_eq!(Vote::from_value(1), Some(Vote::Up));
        assert_eq!(Vote::from_value(-1), Some(Vote::Down));
        assert_eq!(Vote::from_value(0), None);
    }

    // Service tests

    #[tokio::test]
    async fn test_rate_transition_not_found() {
        let rating_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let transition_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<transition::Model>::new()])
                .into_connection(),
        );

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            TransitionRepository::new(transition_db),
        );

        let result = service.rate("a1", "missing", Vote::Up).await;
        match result {
            Err(AppError::TransitionNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected TransitionNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_rate_first_vote_upserts() {
        let transition = create_test_transition("tr1", "owner");
        let inserted = create_test_rating("r1", "a1", "tr1", 1);

        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // no existing rating
                .append_query_results([Vec::<rating::Model>::new()])
                // upsert returning
                .append_query_results([[inserted.clone()]])
                // tally query
                .append_query_results([[inserted]])
                .into_connection(),
        );
        let transition_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[transition]])
                .into_connection(),
        );

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            TransitionRepository::new(transition_db),
        );

        let outcome = service.rate("a1", "tr1", Vote::Up).await.unwrap();
        assert_eq!(outcome.previous, VoteState::Unrated);
        assert_eq!(outcome.current, VoteState::Upvoted);
        assert_eq!(outcome.tally.upvotes, 1);
        assert_eq!(outcome.tally.score, 1);
    }

    #[tokio::test]
    async fn test_rate_same_vote_retracts() {
        let transition = create_test_transition("tr1", "owner");
        let existing = create_test_rating("r1", "a1", "tr1", 1);

        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // existing upvote
                .append_query_results([[existing]])
                // tally query after delete: no rows left
                .append_query_results([Vec::<rating::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let transition_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[transition]])
                .into_connection(),
        );

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            TransitionRepository::new(transition_db),
        );

        let outcome = service.rate("a1", "tr1", Vote::Up).await.unwrap();
        assert_eq!(outcome.previous, VoteState::Upvoted);
        assert_eq!(outcome.current, VoteState::Unrated);
        assert_eq!(outcome.tally, RatingTally::default());
    }

    #[tokio::test]
    async fn test_rate_opposite_vote_switches() {
        let transition = create_test_transition("tr1", "owner");
        let existing = create_test_rating("r1", "a1", "tr1", 1);
        let replaced = create_test_rating("r1", "a1", "tr1", -1);

        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([[replaced.clone()]])
                .append_query_results([[replaced]])
                .into_connection(),
        );
        let transition_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[transition]])
                .into_connection(),
        );

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            TransitionRepository::new(transition_db),
        );

        let outcome = service.rate("a1", "tr1", Vote::Down).await.unwrap();
        assert_eq!(outcome.previous, VoteState::Upvoted);
        assert_eq!(outcome.current, VoteState::Downvoted);
        // Exactly one net downvote, zero upvotes
        assert_eq!(outcome.tally.upvotes, 0);
        assert_eq!(outcome.tally.downvotes, 1);
        assert_eq!(outcome.tally.score, -1);
    }

    #[tokio::test]
    async fn test_vote_state_unrated() {
        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<rating::Model>::new()])
                .into_connection(),
        );
        let transition_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            TransitionRepository::new(transition_db),
        );

        let state = service.vote_state("a1", "tr1").await.unwrap();
        assert_eq!(state, VoteState::Unrated);
    }
}
