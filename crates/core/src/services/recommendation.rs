//! Recommendation service: artist-preference selection with recency fallback.

use std::collections::HashSet;

use transitionflow_common::AppResult;
use transitionflow_db::{
    entities::transition,
    repositories::{RatingRepository, TransitionRepository},
};

/// How many recent transitions are considered as recommendation candidates.
const CANDIDATE_POOL_SIZE: u64 = 100;

/// Sort most-recent first: creation timestamp descending, id descending as
/// the total-order tie-break (ids are ULIDs, so this is still recency).
fn sort_recent_first(items: &mut [transition::Model]) {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Distinct artist names (either track slot) from a set of transitions,
/// lowercased for case-insensitive matching.
fn preferred_artists(upvoted: &[transition::Model]) -> HashSet<String> {
    let mut artists = HashSet::new();
    for t in upvoted {
        if !t.track1_artist.is_empty() {
            artists.insert(t.track1_artist.to_lowercase());
        }
        if !t.track2_artist.is_empty() {
            artists.insert(t.track2_artist.to_lowercase());
        }
    }
    artists
}

/// Select up to `limit` transitions from `pool` for an account whose
/// upvoted transitions are `upvoted`.
///
/// Preference is by artist name: a candidate matches when either of its
/// track artists case-insensitively equals any artist on an upvoted
/// transition. Matched candidates minus `exclude` (transitions the account
/// has already rated) are returned most-recent first; when the account has
/// no preference signal, or nothing survives the filter, the fallback is
/// simply the `limit` most recent pool items with no further exclusion.
/// A pool containing the account's own submissions is legal; ownership is
/// not considered.
#[must_use]
pub fn recommend(
    upvoted: &[transition::Model],
    pool: &[transition::Model],
    exclude: &HashSet<String>,
    limit: usize,
) -> Vec<transition::Model> {
    let mut recent: Vec<transition::Model> = pool.to_vec();
    sort_recent_first(&mut recent);

    let artists = preferred_artists(upvoted);
    if artists.is_empty() {
        recent.truncate(limit);
        return recent;
    }

    let mut matched: Vec<transition::Model> = recent
        .iter()
        .filter(|t| {
            artists.contains(&t.track1_artist.to_lowercase())
                || artists.contains(&t.track2_artist.to_lowercase())
        })
        .filter(|t| !exclude.contains(&t.id))
        .cloned()
        .collect();

    if matched.is_empty() {
        recent.truncate(limit);
        return recent;
    }

    matched.truncate(limit);
    matched
}

/// Recommendation service wiring the selector to the store.
#[derive(Clone)]
pub struct RecommendationService {
    rating_repo: RatingRepository,
    transition_repo: TransitionRepository,
}

impl RecommendationService {
    /// Create a new recommendation service.
    #[must_use]
    pub const fn new(rating_repo: RatingRepository, transition_repo: TransitionRepository) -> Self {
        Self {
            rating_repo,
            transition_repo,
        }
    }

    /// Recommend transitions for an account.
    pub async fn for_account(
        &self,
        account_id: &str,
        limit: usize,
    ) -> AppResult<Vec<transition::Model>> {
        // Everything the account has rated is excluded from matches
        let rated = self.rating_repo.find_by_account(account_id).await?;
        let exclude: HashSet<String> = rated.iter().map(|r| r.transition_id.clone()).collect();

        // The preference signal: transitions the account upvoted
        let upvoted_ids: Vec<String> = rated
            .iter()
            .filter(|r| r.value > 0)
            .map(|r| r.transition_id.clone())
            .collect();
        let upvoted = self.transition_repo.find_by_ids(&upvoted_ids).await?;

        let pool = self
            .transition_repo
            .find_recent(CANDIDATE_POOL_SIZE, None)
            .await?;

        Ok(recommend(&upvoted, &pool, &exclude, limit))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn transition_at(
        id: &str,
        artist1: &str,
        artist2: &str,
        minutes_ago: i64,
    ) -> transition::Model {
        transition::Model {
            id: id.to_string(),
            account_id: "owner".to_string(),
            track1_id: "t1".to_string(),
            track1_name: "Track A".to_string(),
            track1_artist: artist1.to_string(),
            track1_image: None,
            track2_id: "t2".to_string(),
            track2_name: "Track B".to_string(),
            track2_artist: artist2.to_string(),
            track2_image: None,
            crossfade_seconds: 8,
            description: None,
            tags: json!([]),
            views_count: 0,
            created_at: (Utc::now() - Duration::minutes(minutes_ago)).into(),
        }
    }

    #[test]
    fn test_fallback_returns_most_recent_in_order() {
        // 8 items, t1 newest .. t8 oldest
        let pool: Vec<_> = (1..=8)
            .map(|i| transition_at(&format!("tr{i}"), "X", "Y", i))
            .collect();

        let result = recommend(&[], &pool, &HashSet::new(), 6);

        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr1", "tr2", "tr3", "tr4", "tr5", "tr6"]);
    }

    #[test]
    fn test_fallback_with_small_pool() {
        let pool = vec![transition_at("tr1", "X", "Y", 1)];
        let result = recommend(&[], &pool, &HashSet::new(), 6);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_filters_by_preferred_artist() {
        let upvoted = vec![transition_at("liked", "Daft Punk", "Justice", 60)];
        let pool = vec![
            transition_at("tr1", "Daft Punk", "Moderat", 1),
            transition_at("tr2", "Coldplay", "Muse", 2),
        ];

        let result = recommend(&upvoted, &pool, &HashSet::new(), 6);

        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr1"]);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_covers_both_slots() {
        let upvoted = vec![transition_at("liked", "daft punk", "justice", 60)];
        let pool = vec![
            // Preference artist in the second slot, different case
            transition_at("tr1", "Moderat", "DAFT PUNK", 1),
            transition_at("tr2", "Coldplay", "Muse", 2),
        ];

        let result = recommend(&upvoted, &pool, &HashSet::new(), 6);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "tr1");
    }

    #[test]
    fn test_excludes_already_rated() {
        let upvoted = vec![transition_at("liked", "Daft Punk", "Justice", 60)];
        let pool = vec![
            transition_at("tr1", "Daft Punk", "Moderat", 1),
            transition_at("tr2", "Daft Punk", "Muse", 2),
        ];
        let exclude: HashSet<String> = ["tr1".to_string()].into_iter().collect();

        let result = recommend(&upvoted, &pool, &exclude, 6);

        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr2"]);
    }

    #[test]
    fn test_falls_back_when_everything_matched_is_excluded() {
        let upvoted = vec![transition_at("liked", "Daft Punk", "Justice", 60)];
        let pool = vec![
            transition_at("tr1", "Daft Punk", "Moderat", 1),
            transition_at("tr2", "Coldplay", "Muse", 2),
        ];
        let exclude: HashSet<String> = ["tr1".to_string()].into_iter().collect();

        let result = recommend(&upvoted, &pool, &exclude, 6);

        // Nothing survives the filter, so the recency list comes back whole
        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr1", "tr2"]);
    }

    #[test]
    fn test_matches_ordered_most_recent_first() {
        let upvoted = vec![transition_at("liked", "Daft Punk", "Justice", 60)];
        let pool = vec![
            transition_at("tr_old", "Daft Punk", "A", 30),
            transition_at("tr_new", "Daft Punk", "B", 1),
        ];

        let result = recommend(&upvoted, &pool, &HashSet::new(), 6);

        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr_new", "tr_old"]);
    }

    #[test]
    fn test_ties_broken_by_id_descending() {
        let ts = Utc::now();
        let mut a = transition_at("tr_a", "X", "Y", 0);
        let mut b = transition_at("tr_b", "X", "Y", 0);
        a.created_at = ts.into();
        b.created_at = ts.into();

        let result = recommend(&[], &[a, b], &HashSet::new(), 2);

        let ids: Vec<_> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["tr_b", "tr_a"]);
    }

    #[test]
    fn test_own_submissions_are_not_special_cased() {
        // The pool entry belongs to the same account that upvoted; it is
        // still eligible
        let upvoted = vec![transition_at("liked", "Daft Punk", "Justice", 60)];
        let mut own = transition_at("tr1", "Daft Punk", "Moderat", 1);
        own.account_id = "me".to_string();

        let result = recommend(&upvoted, &[own], &HashSet::new(), 6);

        assert_eq!(result.len(), 1);
    }
}
