//! `/api/employees` handlers.

use super::{
    AppState, created, json_body, ok, ok_with_message, parse_date, parse_flag, path_id,
};
use crate::{
    core::{
        assignment::get_available_employees,
        employee::{self, EmployeeChanges, NewEmployee},
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
use serde::Deserialize;
use serde_json::json;

/// Query string of the employee listing.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Case-insensitive substring of code, name or designation
    pub search: Option<String>,
    /// `true` restricts the list to employees free on `date`
    pub available: Option<String>,
    /// Date for the availability filter, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Body of the create and update requests. Missing fields are reported as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeRequest {
    /// External code; also accepted as `employee_code`
    #[serde(alias = "employee_code")]
    pub employee_id: Option<String>,
    /// Full name
    pub name: Option<String>,
    /// Rank or designation
    pub designation: Option<String>,
    /// Contact number
    pub mobile_number: Option<String>,
}

/// Lists employees by name, filtered by a search term or by availability on a date.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> Result<Response> {
    let employees = if parse_flag("available", query.available.as_deref())? == Some(true) {
        let date = parse_date(query.date.as_deref())?;
        get_available_employees(&state.db, date).await?
    } else if let Some(term) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        employee::search_employees(&state.db, term).await?
    } else {
        employee::get_all_employees(&state.db).await?
    };
    Ok(ok(employees))
}

/// Adds an employee; 409 when the code is taken.
pub async fn create_employee(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Response> {
    let body = json_body(payload)?;
    let employee = employee::create_employee(
        &state.db,
        NewEmployee {
            employee_code: body.employee_id.unwrap_or_default(),
            name: body.name.unwrap_or_default(),
            designation: body.designation.unwrap_or_default(),
            mobile_number: body.mobile_number.unwrap_or_default(),
        },
    )
    .await?;
    Ok(created(employee, "Employee created successfully"))
}

/// Updates name, designation and mobile number. A supplied `employee_id` is ignored.
pub async fn update_employee(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Response> {
    let id = path_id(id)?;
    let body = json_body(payload)?;
    let employee = employee::update_employee(
        &state.db,
        id,
        EmployeeChanges {
            name: body.name.unwrap_or_default(),
            designation: body.designation.unwrap_or_default(),
            mobile_number: body.mobile_number.unwrap_or_default(),
        },
    )
    .await?;
    Ok(ok_with_message(employee, "Employee updated successfully"))
}

/// Removes an employee and all of their assignments.
pub async fn delete_employee(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = path_id(id)?;
    employee::delete_employee(&state.db, id).await?;
    Ok(ok_with_message(
        json!({ "deleted_id": id }),
        "Employee deleted successfully",
    ))
}
