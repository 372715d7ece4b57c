//! `/api/duties` handlers.

use super::{AppState, created, json_body, ok, ok_with_message, parse_flag, path_id};
use crate::{
    core::duty::{self, DutyInput, summarize_catalog},
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

/// Query string of the duty listing.
#[derive(Debug, Default, Deserialize)]
pub struct DutyQuery {
    /// Case-insensitive substring of label or description
    pub search: Option<String>,
    /// `true` or `false` filters on the permanent flag
    pub permanent: Option<String>,
}

/// Body of the create and update requests.
#[derive(Debug, Default, Deserialize)]
pub struct DutyRequest {
    /// Duty label
    pub duty_type: Option<String>,
    /// Description; also accepted as `description`
    #[serde(alias = "description")]
    pub duty_description: Option<String>,
    /// Standing duty flag, `false` when omitted
    pub is_permanent: Option<bool>,
}

impl DutyRequest {
    fn into_input(self) -> DutyInput {
        DutyInput {
            duty_type: self.duty_type.unwrap_or_default(),
            description: self.duty_description.unwrap_or_default(),
            is_permanent: self.is_permanent.unwrap_or(false),
        }
    }
}

/// Lists duties by label together with the catalogue summary of the listed duties.
pub async fn list_duties(
    State(state): State<AppState>,
    Query(query): Query<DutyQuery>,
) -> Result<Response> {
    let permanent = parse_flag("permanent", query.permanent.as_deref())?;
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());

    let duties = duty::list_duties(&state.db, search, permanent).await?;
    let summary = summarize_catalog(&duties);
    Ok(ok(json!({ "duties": duties, "summary": summary })))
}

/// Adds a duty type; 409 when the label already exists ignoring case.
pub async fn create_duty(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DutyRequest>, JsonRejection>,
) -> Result<Response> {
    let body = json_body(payload)?;
    let duty = duty::create_duty(&state.db, body.into_input()).await?;
    Ok(created(duty, "Duty created successfully"))
}

/// Replaces label, description and permanent flag of a duty.
pub async fn update_duty(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<DutyRequest>, JsonRejection>,
) -> Result<Response> {
    let id = path_id(id)?;
    let body = json_body(payload)?;
    let duty = duty::update_duty(&state.db, id, body.into_input()).await?;
    Ok(ok_with_message(duty, "Duty updated successfully"))
}

/// Removes a duty and every assignment to it.
pub async fn delete_duty(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = path_id(id)?;
    duty::delete_duty(&state.db, id).await?;
    Ok(ok_with_message(
        json!({ "deleted_id": id }),
        "Duty deleted successfully",
    ))
}

#[cfg(test)]
mod tests {
    use crate::{errors::Result, test_utils::*};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_duty_and_case_insensitive_duplicate() -> Result<()> {
        let (app, _db) = test_app().await?;
        let payload = json!({
            "duty_type": "Main Gate Security",
            "duty_description": "Static guard at the main gate",
            "is_permanent": true
        });

        let (status, body) = send_request(&app, Method::POST, "/api/duties", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["is_permanent"], true);
        let id = body["data"]["id"].clone();

        let (status, body) = send_request(
            &app,
            Method::POST,
            "/api/duties",
            Some(json!({ "duty_type": "MAIN GATE SECURITY", "description": "again" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["existing_id"], id);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_duties_with_summary_and_filters() -> Result<()> {
        let (app, db) = test_app().await?;
        create_custom_duty(&db, "Main Gate Security", "Entrance control", true).await?;
        create_custom_duty(&db, "Casual Leave", "Short leave", false).await?;

        let (status, body) = send_request(&app, Method::GET, "/api/duties", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["duties"][0]["duty_type"], "Casual Leave");
        assert_eq!(body["data"]["summary"]["guard"], 1);
        assert_eq!(body["data"]["summary"]["leave"], 1);

        let (_, body) = send_request(&app, Method::GET, "/api/duties?permanent=true", None).await;
        let duties = body["data"]["duties"].as_array().cloned().unwrap_or_default();
        assert_eq!(duties.len(), 1);
        assert_eq!(duties[0]["duty_type"], "Main Gate Security");

        let (status, _) = send_request(&app, Method::GET, "/api/duties?permanent=maybe", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_duty_is_not_found() -> Result<()> {
        let (app, _db) = test_app().await?;
        let (status, body) = send_request(
            &app,
            Method::PUT,
            "/api/duties/42",
            Some(json!({ "duty_type": "Patrol", "duty_description": "Night patrol" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["duty_id"], 42);

        let (status, _) = send_request(&app, Method::DELETE, "/api/duties/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}
