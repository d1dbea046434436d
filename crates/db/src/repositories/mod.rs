//! Database repositories.

mod account;
mod favorite;
mod rating;
mod transition;

pub use account::AccountRepository;
pub use favorite::FavoriteRepository;
pub use rating::RatingRepository;
pub use transition::TransitionRepository;
