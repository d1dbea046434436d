//! Rating entity (signed votes on transitions).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The account that voted
    pub account_id: String,

    /// The transition being voted on
    pub transition_id: String,

    /// +1 upvote, -1 downvote; zero is never stored
    pub value: i16,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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
