//! Database configuration module for the duty roster.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Indexes that span several columns cannot
//! be expressed on the entities and are issued as explicit `sea_query` statements.

use crate::entities::{Assignment, Duty, Employee, assignment};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/duty_roster.sqlite?mode=rwc";

/// Name of the unique index enforcing one duty per employee per day.
pub const UNIQUE_DAILY_ASSIGNMENT_INDEX: &str = "idx_assignments_date_employee";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(|path| path.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    debug!("Opening database connection");
    Database::connect(database_url).await.map_err(Into::into)
}

/// File path of a `sqlite://` URL, without query parameters. `None` for in-memory databases.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty() && !path.starts_with(":memory:")).then(|| Path::new(path))
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Safe to call on every startup. Parents are created before `assignments` so the
/// foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut employee_table = schema.create_table_from_entity(Employee);
    employee_table.if_not_exists();
    let mut duty_table = schema.create_table_from_entity(Duty);
    duty_table.if_not_exists();
    let mut assignment_table = schema.create_table_from_entity(Assignment);
    assignment_table.if_not_exists();

    db.execute(builder.build(&employee_table)).await?;
    db.execute(builder.build(&duty_table)).await?;
    db.execute(builder.build(&assignment_table)).await?;

    for index in assignment_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    info!("Database tables ensured");
    Ok(())
}

fn assignment_indexes() -> [IndexCreateStatement; 3] {
    [
        Index::create()
            .name(UNIQUE_DAILY_ASSIGNMENT_INDEX)
            .table(Assignment)
            .col(assignment::Column::Date)
            .col(assignment::Column::EmployeeId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_assignments_date")
            .table(Assignment)
            .col(assignment::Column::Date)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_assignments_duty_id")
            .table(Assignment)
            .col(assignment::Column::DutyId)
            .if_not_exists()
            .to_owned(),
    ]
}
