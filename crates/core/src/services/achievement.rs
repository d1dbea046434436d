//! Achievement service: threshold badges over account counters.

use std::collections::HashMap;

use serde::Serialize;
use transitionflow_common::AppResult;
use transitionflow_db::repositories::{RatingRepository, TransitionRepository};

/// The counter an achievement threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Submissions,
    RatingsGiven,
    MaxUpvotesReceived,
}

/// An achievement definition.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub metric: Metric,
    pub threshold: u64,
}

/// The built-in achievement catalog.
pub const ACHIEVEMENT_CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_transition",
        title: "First Transition",
        description: "Submit your first transition",
        metric: Metric::Submissions,
        threshold: 1,
    },
    AchievementDef {
        id: "transition_enthusiast",
        title: "Transition Enthusiast",
        description: "Submit 5 transitions",
        metric: Metric::Submissions,
        threshold: 5,
    },
    AchievementDef {
        id: "transition_master",
        title: "Transition Master",
        description: "Submit 20 transitions",
        metric: Metric::Submissions,
        threshold: 20,
    },
    AchievementDef {
        id: "first_rating",
        title: "First Rating",
        description: "Rate your first transition",
        metric: Metric::RatingsGiven,
        threshold: 1,
    },
    AchievementDef {
        id: "rating_enthusiast",
        title: "Rating Enthusiast",
        description: "Rate 10 transitions",
        metric: Metric::RatingsGiven,
        threshold: 10,
    },
    AchievementDef {
        id: "popular_transition",
        title: "Popular Transition",
        description: "Get 5 upvotes on one of your transitions",
        metric: Metric::MaxUpvotesReceived,
        threshold: 5,
    },
];

/// Aggregate counters for one account, recomputed from the store on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCounters {
    pub submissions: u64,
    pub ratings_given: u64,
    pub max_upvotes_received: u64,
}

impl AccountCounters {
    /// The counter value for a metric.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Submissions => self.submissions,
            Metric::RatingsGiven => self.ratings_given,
            Metric::MaxUpvotesReceived => self.max_upvotes_received,
        }
    }
}

/// Evaluate which achievements the counters satisfy.
///
/// An achievement is earned iff its metric's counter has reached the
/// threshold; the result is monotone in the counters.
#[must_use]
pub fn evaluate<'a>(
    counters: AccountCounters,
    catalog: &'a [AchievementDef],
) -> Vec<&'a AchievementDef> {
    catalog
        .iter()
        .filter(|def| counters.get(def.metric) >= def.threshold)
        .collect()
}

/// One achievement with its earned state for an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub def: AchievementDef,
    pub earned: bool,
    /// Current value of the achievement's metric.
    pub progress: u64,
}

/// Achievement service for business logic.
#[derive(Clone)]
pub struct AchievementService {
    transition_repo: TransitionRepository,
    rating_repo: RatingRepository,
}

impl AchievementService {
    /// Create a new achievement service.
    #[must_use]
    pub const fn new(transition_repo: TransitionRepository, rating_repo: RatingRepository) -> Self {
        Self {
            transition_repo,
            rating_repo,
        }
    }

    /// Recompute an account's aggregate counters from the store.
    pub async fn counters_for(&self, account_id: &str) -> AppResult<AccountCounters> {
        let submissions = self.transition_repo.count_by_account(account_id).await?;
        let ratings_given = self.rating_repo.count_by_account(account_id).await?;

        // Max upvotes on any single owned transition
        let owned = self.transition_repo.find_all_by_account(account_id).await?;
        let owned_ids: Vec<String> = owned.iter().map(|t| t.id.clone()).collect();
        let ratings = self.rating_repo.find_by_transitions(&owned_ids).await?;

        let mut upvotes_by_transition: HashMap<&str, u64> = HashMap::new();
        for r in &ratings {
            if r.value > 0 {
                *upvotes_by_transition
                    .entry(r.transition_id.as_str())
                    .or_default() += 1;
            }
        }
        let max_upvotes_received = upvotes_by_transition.values().copied().max().unwrap_or(0);

        Ok(AccountCounters {
            submissions,
            ratings_given,
            max_upvotes_received,
        })
    }

    /// The full catalog with earned flags and progress for an account.
    pub async fn for_account(&self, account_id: &str) -> AppResult<Vec<AchievementStatus>> {
        let counters = self.counters_for(account_id).await?;

        Ok(ACHIEVEMENT_CATALOG
            .iter()
            .map(|def| AchievementStatus {
                def: *def,
                earned: counters.get(def.metric) >= def.threshold,
                progress: counters.get(def.metric),
            })
            .collect())
    }
}
