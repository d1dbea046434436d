//! Transition entity (a user-submitted pairing of two tracks).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transition")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Submitting account ID
    #[sea_orm(indexed)]
    pub account_id: String,

    /// Catalog id of the outgoing track
    pub track1_id: String,

    pub track1_name: String,

    /// Artist name, denormalized for recommendation matching
    pub track1_artist: String,

    #[sea_orm(nullable)]
    pub track1_image: Option<String>,

    /// Catalog id of the incoming track
    pub track2_id: String,

    pub track2_name: String,

    /// Artist name, denormalized for recommendation matching
    pub track2_artist: String,

    #[sea_orm(nullable)]
    pub track2_image: Option<String>,

    /// Suggested crossfade length, bounded 1..=15 at creation
    pub crossfade_seconds: i32,

    /// Free-text description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Tags
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    /// View count (denormalized, only mutable field)
    #[sea_orm(default_value = 0)]
    pub views_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
