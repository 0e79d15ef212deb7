//! `SeaORM` Entity for loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LoanStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub available_amount: Decimal,
    pub total_months: i32,
    pub paid_months: i32,
    pub interest_rate: Decimal,
    pub total_payable: Decimal,
    pub remaining_balance: Decimal,
    pub total_amount_paid: Decimal,
    pub status: LoanStatus,
    pub start_date: DateTimeWithTimeZone,
    pub completion_date: Option<DateTimeWithTimeZone>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::repayment_slips::Entity")]
    RepaymentSlips,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::repayment_slips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepaymentSlips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
