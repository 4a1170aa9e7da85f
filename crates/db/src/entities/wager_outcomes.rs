//! `SeaORM` Entity for the wager_outcomes table.
//!
//! Rows are append-only: the repository layer exposes no update or delete
//! for this entity, so the table is the durable audit trail of settlements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wager_outcomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Caller-supplied idempotency key; unique when present.
    pub request_id: Option<Uuid>,
    pub bet_amount: Decimal,
    pub payout: Decimal,
    /// Opaque payload describing the wager shape.
    pub panels: Json,
    /// Opaque payload describing the outcome detail.
    pub outcome: Json,
    /// Snapshot of the account balance immediately after this record.
    pub balance_after: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
