//! Translation of [`Error`] into JSON error responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use tracing::error;

impl Error {
    /// Extra JSON fields describing the offending record or field.
    fn context(&self) -> Map<String, Value> {
        let mut context = Map::new();
        match self {
            Self::Validation {
                field: Some(field), ..
            } => {
                context.insert("field".into(), json!(field));
            }
            Self::EmployeeNotFound { id } => {
                context.insert("employee_id".into(), json!(id));
            }
            Self::DutyNotFound { id } => {
                context.insert("duty_id".into(), json!(id));
            }
            Self::AssignmentNotFound { id } => {
                context.insert("id".into(), json!(id));
            }
            Self::AssignmentConflict {
                date,
                employee_id,
                existing,
            } => {
                context.insert("date".into(), json!(date));
                context.insert("employee_id".into(), json!(employee_id));
                if let Some(existing) = existing {
                    context.insert("employee_name".into(), json!(existing.employee_name));
                    context.insert(
                        "existing_assignment".into(),
                        serde_json::to_value(existing).unwrap_or(Value::Null),
                    );
                }
            }
            Self::DuplicateEmployeeCode { code } => {
                context.insert("employee_id".into(), json!(code));
            }
            Self::DuplicateDutyType { existing_id, .. } => {
                context.insert("existing_id".into(), json!(existing_id));
            }
            _ => {}
        }
        context
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));

        if self.is_internal() {
            error!(error = %self, "Request failed");
            let summary = match self {
                Self::Export { .. } | Self::Xlsx(_) => "Failed to generate export",
                _ => "Internal server error",
            };
            body.insert("error".into(), json!(summary));
            body.insert("details".into(), json!(self.to_string()));
        } else {
            body.insert("error".into(), json!(self.to_string()));
            body.extend(self.context());
        }

        (status, Json(Value::Object(body))).into_response()
    }
}
