//! Account entity.
//!
//! Identity lives at the external streaming provider; this table is a
//! denormalized profile mirror plus the opaque session token.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Subject id at the identity provider
    #[sea_orm(unique)]
    pub provider_id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Display name
    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Opaque session token
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transition::Entity")]
    Transitions,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
}

impl Related<super::transition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transitions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
