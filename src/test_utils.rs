//! Shared test utilities for the duty roster service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    api::{AppState, router},
    core::{
        assignment::{AssignmentDetail, create_assignment},
        duty::{DutyInput, create_duty},
        employee::{NewEmployee, create_employee},
    },
    entities,
    errors::Result,
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness so it shows up on failure.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Parses a `YYYY-MM-DD` literal.
///
/// # Panics
/// Panics if `value` is not a valid date.
#[allow(clippy::unwrap_used)]
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Creates a test employee with sensible defaults.
///
/// # Defaults
/// * `designation`: "Constable"
/// * `mobile_number`: "9800000000"
pub async fn create_test_employee(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<entities::employee::Model> {
    create_custom_employee(db, code, name, "Constable", "9800000000").await
}

/// Creates a test employee with custom parameters.
pub async fn create_custom_employee(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    designation: &str,
    mobile_number: &str,
) -> Result<entities::employee::Model> {
    create_employee(
        db,
        NewEmployee {
            employee_code: code.to_string(),
            name: name.to_string(),
            designation: designation.to_string(),
            mobile_number: mobile_number.to_string(),
        },
    )
    .await
}

/// Creates a non-permanent test duty whose description repeats its label.
pub async fn create_test_duty(
    db: &DatabaseConnection,
    duty_type: &str,
) -> Result<entities::duty::Model> {
    create_custom_duty(db, duty_type, &format!("{duty_type} duty"), false).await
}

/// Creates a test duty with custom parameters.
pub async fn create_custom_duty(
    db: &DatabaseConnection,
    duty_type: &str,
    description: &str,
    is_permanent: bool,
) -> Result<entities::duty::Model> {
    create_duty(
        db,
        DutyInput {
            duty_type: duty_type.to_string(),
            description: description.to_string(),
            is_permanent,
        },
    )
    .await
}

/// Assigns an employee to a duty on the given `YYYY-MM-DD` date.
pub async fn create_test_assignment(
    db: &DatabaseConnection,
    on: &str,
    duty_id: i64,
    employee_id: i64,
) -> Result<AssignmentDetail> {
    create_assignment(db, date(on), duty_id, employee_id).await
}

/// Builds the full router over a fresh in-memory database.
/// Returns the connection too, so tests can arrange data directly.
pub async fn test_app() -> Result<(Router, Arc<DatabaseConnection>)> {
    init_test_tracing();
    let state = AppState::new(setup_test_db().await?);
    let db = Arc::clone(&state.db);
    Ok((router(state), db))
}

/// Sends a request through the router and decodes the JSON response body.
/// An empty or non-JSON body decodes to `Value::Null`.
#[allow(clippy::unwrap_used)]
pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Sends a request with an optional JSON body.
#[allow(clippy::unwrap_used)]
pub async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    send_raw(app, request).await
}
