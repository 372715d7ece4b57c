//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod assignment;
pub mod duty;
pub mod employee;

// Re-export specific types to avoid conflicts
pub use assignment::{
    Column as AssignmentColumn, Entity as Assignment, Model as AssignmentModel,
};
pub use duty::{Column as DutyColumn, Entity as Duty, Model as DutyModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
