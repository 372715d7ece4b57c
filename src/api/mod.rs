//! HTTP interface - JSON routes over the core operations.
//!
//! Handlers parse and validate request input, call into [`crate::core`], and wrap the result
//! in the `{"success": ..., "data": ...}` envelope. Every failure is an [`Error`] and is
//! rendered by its `IntoResponse` implementation.

/// Assignment routes
pub mod assignments;
/// Duty routes
pub mod duties;
/// Employee routes
pub mod employees;
mod error;
/// Spreadsheet download routes
pub mod export;

use crate::errors::{Error, Result};
use axum::{
    Json, Router,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    /// Wraps a database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employees/:id",
            put(employees::update_employee).delete(employees::delete_employee),
        )
        .route(
            "/api/duties",
            get(duties::list_duties).post(duties::create_duty),
        )
        .route(
            "/api/duties/:id",
            put(duties::update_duty).delete(duties::delete_duty),
        )
        .route(
            "/api/assignments",
            get(assignments::day_view).post(assignments::create_assignment),
        )
        .route(
            "/api/assignments/:id",
            put(assignments::update_assignment).delete(assignments::delete_assignment),
        )
        .route(
            "/api/export",
            get(export::download_roster)
                .post(export::download_custom_roster)
                .layer(export::cors_layer()),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Success envelope shared by all JSON routes.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures go through [`Error`]
    pub success: bool,
    /// Payload of the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable confirmation for writes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

pub(crate) fn ok<T: Serialize>(data: T) -> Response {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        message: None,
    })
    .into_response()
}

pub(crate) fn ok_with_message<T: Serialize>(data: T, message: &'static str) -> Response {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        message: Some(message),
    })
    .into_response()
}

pub(crate) fn created<T: Serialize>(data: T, message: &'static str) -> Response {
    (StatusCode::CREATED, ok_with_message(data, message)).into_response()
}

/// Unwraps a JSON body, turning malformed payloads into validation errors.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| Error::Validation {
        message: format!("Invalid request body: {}", rejection.body_text()),
        field: None,
    })
}

/// Unwraps a numeric path id, turning anything unparsable into a validation error.
pub(crate) fn path_id(id: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    id.map(|Path(id)| id).map_err(|rejection| {
        Error::validation("id", format!("Invalid id: {}", rejection.body_text()))
    })
}

/// Rejects a missing request field.
pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::validation(field, format!("Missing required field: {field}")))
}

/// Parses a strict `YYYY-MM-DD` date. Anything else, including impossible calendar dates
/// such as `2024-02-30`, is a validation error.
pub(crate) fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        return Err(Error::validation(
            "date",
            "Date parameter is required (YYYY-MM-DD format)",
        ));
    }

    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    well_formed
        .then(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| Error::validation("date", "Invalid date format. Use YYYY-MM-DD"))
}

/// Parses an optional `true`/`false` query flag.
pub(crate) fn parse_flag(field: &'static str, value: Option<&str>) -> Result<Option<bool>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(flag) if flag.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(flag) if flag.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(Error::validation(
            field,
            format!("{field} must be true or false, got '{other}'"),
        )),
    }
}
