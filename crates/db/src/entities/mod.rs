//! Database entities.

pub mod account;
pub mod favorite;
pub mod rating;
pub mod transition;

pub use account::Entity as Account;
pub use favorite::Entity as Favorite;
pub use rating::Entity as Rating;
pub use transition::Entity as Transition;
