//! Core business logic - framework-agnostic employee, duty, assignment and reporting operations.
//!
//! Every function takes a `SeaORM` connection and returns [`crate::errors::Result`], so the
//! HTTP layer only translates requests and errors.

/// Daily duty assignments, availability and statistics
pub mod assignment;
/// Duty type management and catalogue summaries
pub mod duty;
/// Employee management
pub mod employee;
/// Categorized roster report for a single date
pub mod report;
/// Idempotent startup seeding
pub mod seed;

use sea_orm::{DbErr, SqlErr};

/// Returns true when the database rejected a write because of a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(field: &'static str, value: &str) -> crate::errors::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::errors::Error::validation(
            field,
            format!("Missing required field: {field}"),
        ));
    }
    Ok(trimmed.to_string())
}
