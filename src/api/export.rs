//! `/api/export` handlers: spreadsheet downloads of a day's roster.

use super::{AppState, json_body, parse_date, required};
use crate::{
    errors::{Error, Result},
    export::{ExportFile, XLSX_CONTENT_TYPE, export_roster},
};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{Method, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

/// Query string of `GET /api/export`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Roster date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Only `xlsx` is supported; omitted means `xlsx`
    pub format: Option<String>,
}

/// Body of `POST /api/export`.
#[derive(Debug, Default, Deserialize)]
pub struct CustomExportRequest {
    /// Roster date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Title used for the download name
    pub custom_title: Option<String>,
}

/// Cross-origin policy of the download route, answering browser preflight requests.
pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn download(file: ExportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::CACHE_CONTROL,
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, "0".to_string()),
        ],
        file.content,
    )
        .into_response()
}

/// Downloads the roster as `Police_Duty_Roster_<date>.xlsx`.
pub async fn download_roster(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response> {
    let date = parse_date(query.date.as_deref())?;
    if let Some(format) = query.format.as_deref() {
        if !format.eq_ignore_ascii_case("xlsx") {
            return Err(Error::validation(
                "format",
                "Unsupported format. Only xlsx is supported",
            ));
        }
    }

    let file = export_roster(&state.db, date, None).await?;
    Ok(download(file))
}

/// Downloads the roster under a file name derived from `custom_title`.
pub async fn download_custom_roster(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CustomExportRequest>, JsonRejection>,
) -> Result<Response> {
    let body = json_body(payload)?;
    let date = parse_date(Some(required("date", body.date)?.as_str()))?;

    let file = export_roster(&state.db, date, body.custom_title.as_deref()).await?;
    Ok(download(file))
}
