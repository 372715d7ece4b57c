//! Employee entity - Represents a member of the police personnel.
//!
//! Each employee carries an external `employee_code` (unique, never changed after
//! creation), a display name, a free-text designation (rank) and a contact number.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Generated primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// External identifier issued by the department (e.g. `"EMP0001"`)
    #[sea_orm(unique)]
    pub employee_code: String,
    /// Full name
    pub name: String,
    /// Rank or designation (e.g. "Constable", "Sub-Inspector")
    pub designation: String,
    /// Contact number
    pub mobile_number: String,
    /// When the employee was created
    pub created_at: DateTime,
    /// When the employee was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many daily assignments
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
