//! `/api/assignments` handlers.

use super::{
    AppState, created, json_body, ok, ok_with_message, parse_date, parse_flag, path_id, required,
};
use crate::{
    core::{
        assignment::{self, AssignmentDetail, AssignmentStats},
        report::format_roster_date,
    },
    errors::Result,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Query string of the day view.
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    /// Roster date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// `true` adds headcount statistics
    pub stats: Option<String>,
}

/// Body of `POST /api/assignments`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAssignmentRequest {
    /// Roster date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Duty to assign
    pub duty_id: Option<i64>,
    /// Employee to assign
    pub employee_id: Option<i64>,
}

/// Body of `PUT /api/assignments/:id`. The date cannot be changed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    /// New duty
    pub duty_id: Option<i64>,
    /// New employee
    pub employee_id: Option<i64>,
}

/// Everything the roster screen shows for one date.
#[derive(Debug, Serialize)]
pub struct DayView {
    /// Requested date
    pub date: NaiveDate,
    /// Long form, e.g. `January 01, 2024 (Monday)`
    pub formatted_date: String,
    /// Assignments ordered by duty label
    pub assignments: Vec<AssignmentDetail>,
    /// Headcounts, only when requested
    pub statistics: Option<AssignmentStats>,
    /// Employees with no duty on the date
    pub available_employees: usize,
    /// Number of assignments on the date
    pub total_assignments: usize,
}

/// Returns the date's assignments, its free headcount and optionally its statistics.
pub async fn day_view(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Response> {
    let date = parse_date(query.date.as_deref())?;
    let with_stats = parse_flag("stats", query.stats.as_deref())?.unwrap_or(false);

    let assignments = assignment::get_assignments_for_date(&state.db, date).await?;
    let statistics = if with_stats {
        Some(assignment::compute_stats(&state.db, date).await?)
    } else {
        None
    };
    let available = assignment::get_available_employees(&state.db, date).await?;

    Ok(ok(DayView {
        date,
        formatted_date: format_roster_date(date),
        total_assignments: assignments.len(),
        assignments,
        statistics,
        available_employees: available.len(),
    }))
}

/// Assigns an employee to a duty; 409 when the employee is already rostered that day.
pub async fn create_assignment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<Response> {
    let body = json_body(payload)?;
    let date = parse_date(Some(required("date", body.date)?.as_str()))?;
    let duty_id = required("duty_id", body.duty_id)?;
    let employee_id = required("employee_id", body.employee_id)?;

    let detail = assignment::create_assignment(&state.db, date, duty_id, employee_id).await?;
    Ok(created(detail, "Assignment created successfully"))
}

/// Changes the duty and employee of an assignment.
pub async fn update_assignment(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateAssignmentRequest>, JsonRejection>,
) -> Result<Response> {
    let id = path_id(id)?;
    let body = json_body(payload)?;
    let duty_id = required("duty_id", body.duty_id)?;
    let employee_id = required("employee_id", body.employee_id)?;

    let detail = assignment::update_assignment(&state.db, id, duty_id, employee_id).await?;
    Ok(ok_with_message(detail, "Assignment updated successfully"))
}

/// Removes an assignment.
pub async fn delete_assignment(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = path_id(id)?;
    assignment::delete_assignment(&state.db, id).await?;
    Ok(ok_with_message(
        json!({ "deleted_id": id }),
        "Assignment deleted successfully",
    ))
}
