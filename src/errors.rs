//! Unified error type for the duty roster service.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants are grouped
//! by how a caller should react: fix the input, look up a different record,
//! resolve a scheduling conflict, or report an internal failure.

use crate::core::assignment::AssignmentDetail;
use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the roster service.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Malformed or missing input, rejected before reaching the store
    #[error("{message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
        /// Name of the offending field, when one applies
        field: Option<&'static str>,
    },

    /// Referenced employee does not exist
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// Referenced duty does not exist
    #[error("Duty not found: {id}")]
    DutyNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// Referenced assignment does not exist
    #[error("Assignment not found or already deleted: {id}")]
    AssignmentNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// The employee already holds a duty on this date
    #[error("Employee already assigned to another duty on {date}")]
    AssignmentConflict {
        /// Roster date of the collision
        date: NaiveDate,
        /// Employee that is already assigned
        employee_id: i64,
        /// The competing assignment, when it could be loaded
        existing: Option<Box<AssignmentDetail>>,
    },

    /// Another employee already uses this external code
    #[error("Employee ID already exists: {code}")]
    DuplicateEmployeeCode {
        /// The conflicting employee code
        code: String,
    },

    /// A duty with the same label (ignoring case) already exists
    #[error("Duty type already exists: {duty_type}")]
    DuplicateDutyType {
        /// The conflicting label
        duty_type: String,
        /// Primary key of the existing duty
        existing_id: i64,
    },

    /// The roster could not be rendered for export
    #[error("Export error: {message}")]
    Export {
        /// Human-readable description of the problem
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Spreadsheet writer error
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] tied to a specific field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    /// HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::EmployeeNotFound { .. }
            | Self::DutyNotFound { .. }
            | Self::AssignmentNotFound { .. } => 404,
            Self::AssignmentConflict { .. }
            | Self::DuplicateEmployeeCode { .. }
            | Self::DuplicateDutyType { .. } => 409,
            Self::Config { .. }
            | Self::Export { .. }
            | Self::Database(_)
            | Self::Xlsx(_)
            | Self::Io(_) => 500,
        }
    }

    /// Whether this error is an unexpected failure rather than a caller mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
