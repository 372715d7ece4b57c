//! Duty entity - A named duty type that employees can be assigned to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Duty database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "duties")]
pub struct Model {
    /// Generated primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Duty label (e.g. "Main Gate Security"); unique ignoring case
    pub duty_type: String,
    /// Longer description shown alongside the label
    pub description: String,
    /// Standing, recurring duty rather than a special-purpose one
    pub is_permanent: bool,
    /// When the duty was created
    pub created_at: DateTime,
    /// When the duty was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Duty and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One duty is held through many assignments
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
