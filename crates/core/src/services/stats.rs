//! Stats service: per-account analytics aggregates.

use serde::Serialize;

use crate::services::rating::{self, RatingTally};
use transitionflow_common::AppResult;
use transitionflow_db::repositories::{RatingRepository, TransitionRepository};

/// How many top transitions the stats view carries.
const TOP_TRANSITIONS: usize = 5;

/// One of an account's submissions, ranked for the stats view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTransition {
    pub id: String,
    pub track1_name: String,
    pub track2_name: String,
    pub tally: RatingTally,
    pub views: i32,
}

/// Aggregate statistics for one account's submissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_transitions: u64,
    /// Sum of view counters; missing view data counts as zero.
    pub total_views: i64,
    pub total_upvotes: i64,
    pub total_downvotes: i64,
    pub top_transitions: Vec<TopTransition>,
}

/// Stats service for business logic.
#[derive(Clone)]
pub struct StatsService {
    transition_repo: TransitionRepository,
    rating_repo: RatingRepository,
}

impl StatsService {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(transition_repo: TransitionRepository, rating_repo: RatingRepository) -> Self {
        Self {
            transition_repo,
            rating_repo,
        }
    }

    /// Compute the stats aggregate for an account's submissions.
    pub async fn for_account(&self, account_id: &str) -> AppResult<AccountStats> {
        let transitions = self.transition_repo.find_all_by_account(account_id).await?;
        let ids: Vec<String> = transitions.iter().map(|t| t.id.clone()).collect();
        let ratings = self.rating_repo.find_by_transitions(&ids).await?;

        let mut total_views: i64 = 0;
        let mut total_upvotes: i64 = 0;
        let mut total_downvotes: i64 = 0;

        let mut ranked: Vec<TopTransition> = transitions
            .iter()
            .map(|t| {
                let own: Vec<_> = ratings
                    .iter()
                    .filter(|r| r.transition_id == t.id)
                    .cloned()
                    .collect();
                let tally = rating::tally(&own);

                total_views += i64::from(t.views_count);
                total_upvotes += i64::from(tally.upvotes);
                total_downvotes += i64::from(tally.downvotes);

                TopTransition {
                    id: t.id.clone(),
                    track1_name: t.track1_name.clone(),
                    track2_name: t.track2_name.clone(),
                    tally,
                    views: t.views_count,
                }
            })
            .collect();

        // Rank by score, then views; truncate to the display cap
        ranked.sort_by(|a, b| {
            b.tally
                .score
                .cmp(&a.tally.score)
                .then_with(|| b.views.cmp(&a.views))
        });
        ranked.truncate(TOP_TRANSITIONS);

        Ok(AccountStats {
            total_transitions: transitions.len() as u64,
            total_views,
            total_upvotes,
            total_downvotes,
            top_transitions: ranked,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;
    use transitionflow_db::entities::{rating as rating_entity, transition};

    fn create_test_transition(id: &str, views: i32) -> transition::Model {
        transition::Model {
            id: id.to_string(),
            account_id: "a1".to_string(),
            track1_id: "t1".to_string(),
            track1_name: "From".to_string(),
            track1_artist: "Artist".to_string(),
            track1_image: None,
            track2_id: "t2".to_string(),
            track2_name: "To".to_string(),
            track2_artist: "Artist".to_string(),
            track2_image: None,
            crossfade_seconds: 8,
            description: None,
            tags: json!([]),
            views_count: views,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_rating(id: &str, transition_id: &str, value: i16) -> rating_entity::Model {
        rating_entity::Model {
            id: id.to_string(),
            account_id: "rater".to_string(),
            transition_id: transition_id.to_string(),
            value,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_for_account_totals_and_ranking() {
        let t1 = create_test_transition("tr1", 10);
        let t2 = create_test_transition("tr2", 50);
        let ratings = vec![
            create_test_rating("r1", "tr1", 1),
            create_test_rating("r2", "tr1", 1),
            create_test_rating("r3", "tr2", 1),
            create_test_rating("r4", "tr2", -1),
        ];

        let transition_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1, t2]])
                .into_connection(),
        );
        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([ratings])
                .into_connection(),
        );

        let service = StatsService::new(
            TransitionRepository::new(transition_db),
            RatingRepository::new(rating_db),
        );

        let stats = service.for_account("a1").await.unwrap();

        assert_eq!(stats.total_transitions, 2);
        assert_eq!(stats.total_views, 60);
        assert_eq!(stats.total_upvotes, 3);
        assert_eq!(stats.total_downvotes, 1);
        // tr1 (score 2) outranks tr2 (score 0)
        assert_eq!(stats.top_transitions[0].id, "tr1");
        assert_eq!(stats.top_transitions[1].id, "tr2");
    }

    #[tokio::test]
    async fn test_for_account_no_submissions() {
        let transition_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<transition::Model>::new()])
                .into_connection(),
        );
        let rating_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = StatsService::new(
            TransitionRepository::new(transition_db),
            RatingRepository::new(rating_db),
        );

        let stats = service.for_account("a1").await.unwrap();

        assert_eq!(stats.total_transitions, 0);
        assert_eq!(stats.total_views, 0);
        assert!(stats.top_transitions.is_empty());
    }
}
