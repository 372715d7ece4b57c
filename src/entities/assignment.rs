//! Assignment entity - Binds one employee to one duty on one calendar date.
//!
//! The table carries a unique index over (`date`, `employee_id`) so that an
//! employee holds at most one duty per day. There is no such index
//! over (`date`, `duty_id`): several employees may share a duty on the same day.
//! Both foreign keys cascade on delete.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    /// Generated primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Roster date; never changed after creation
    pub date: Date,
    /// Duty being performed
    pub duty_id: i64,
    /// Employee performing the duty
    pub employee_id: i64,
    /// When the assignment was created
    pub created_at: DateTime,
}

/// Defines relationships between Assignment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one duty
    #[sea_orm(
        belongs_to = "super::duty::Entity",
        from = "Column::DutyId",
        to = "super::duty::Column::Id",
        on_delete = "Cascade"
    )]
    Duty,
    /// Each assignment belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::duty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Duty.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
