//! Favorite (bookmark) entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Favorite entity. Presence-only relation, no payload.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Account that favorited the transition.
    pub account_id: String,

    /// Transition that was favorited.
    pub transition_id: String,

    /// When the favorite was created.
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
    #[sea_orm(
        belongs_to = "super::transition::Entity",
        from = "Column::TransitionId",
        to = "super::transition::Column::Id",
        on_delete = "Cascade"
    )]
    Transition,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::transition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
