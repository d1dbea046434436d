//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod achievement;
pub mod catalog;
pub mod favorite;
pub mod rating;
pub mod recommendation;
pub mod stats;
pub mod transition;
pub mod view_tracker;

pub use account::{AccountService, SyncProfileInput};
pub use achievement::{
    ACHIEVEMENT_CATALOG, AccountCounters, AchievementDef, AchievementService, AchievementStatus,
    Metric, evaluate,
};
pub use catalog::{CatalogClient, CatalogTrack};
pub use favorite::FavoriteService;
pub use rating::{RateOutcome, RatingService, RatingTally, Vote, VoteState, tally};
pub use recommendation::{RecommendationService, recommend};
pub use stats::{AccountStats, StatsService, TopTransition};
pub use transition::{
    CreateTransitionInput, TrackInput, TransitionService, TransitionWithTally,
};
pub use view_tracker::ViewTrackerService;
