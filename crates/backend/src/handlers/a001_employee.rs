use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_employee::{Employee, EmployeeDto};
use serde_json::json;

use crate::domain::a001_employee;
use crate::shared::json_safe::JsonNode;
use crate::shared::spreadsheet::SpreadsheetFormat;
use crate::state::AppState;
use crate::usecases::u501_import_employees::{self, ImportError};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

type ApiError = (StatusCode, Json<serde_json::Value>);

fn detail(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": message.into() })))
}

fn storage_error(context: &str, e: anyhow::Error) -> ApiError {
    tracing::error!("{}: {}", context, e);
    detail(StatusCode::INTERNAL_SERVER_ERROR, format!("{}: {}", context, e))
}

fn not_found() -> ApiError {
    detail(StatusCode::NOT_FOUND, "Employee not found")
}

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "HRManager API is running!" }))
}

/// GET /employees/
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
    a001_employee::service::list_all(&state.db)
        .await
        .map(Json)
        .map_err(|e| storage_error("Failed to list employees", e))
}

/// GET /employees/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, ApiError> {
    match a001_employee::service::get_by_id(&state.db, id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(storage_error("Failed to load employee", e)),
    }
}

/// POST /employees/
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<EmployeeDto>,
) -> Result<Json<Employee>, ApiError> {
    a001_employee::service::create(&state.db, dto)
        .await
        .map(Json)
        .map_err(|e| storage_error("Failed to create employee", e))
}

/// PUT /employees/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<EmployeeDto>,
) -> Result<Json<Employee>, ApiError> {
    match a001_employee::service::update(&state.db, id, dto).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(storage_error("Failed to update employee", e)),
    }
}

/// DELETE /employees/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match a001_employee::service::delete(&state.db, id).await {
        Ok(true) => Ok(Json(json!({ "message": "Employee deleted successfully" }))),
        Ok(false) => Err(not_found()),
        Err(e) => Err(storage_error("Failed to delete employee", e)),
    }
}

/// DELETE /employees/bulk_delete/
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(ids): Json<Vec<i64>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match a001_employee::service::bulk_delete(&state.db, &ids).await {
        Ok(0) => Err(detail(
            StatusCode::NOT_FOUND,
            "No employees found with the given IDs",
        )),
        Ok(n) => Ok(Json(json!({
            "message": format!("Deleted {} employees successfully", n)
        }))),
        Err(e) => Err(storage_error("Failed to delete employees", e)),
    }
}

/// POST /employees/bulk_add/
pub async fn bulk_add(
    State(state): State<AppState>,
    Json(dtos): Json<Vec<EmployeeDto>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match a001_employee::service::bulk_add(&state.db, dtos).await {
        Ok(n) => Ok(Json(json!({
            "message": format!("Added {} employees successfully", n)
        }))),
        Err(e) => Err(storage_error("Failed to add employees", e)),
    }
}

/// POST /employees/upload/
///
/// Multipart form with a `file` field holding an xlsx/xls/ods/csv spreadsheet
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<JsonNode>, ApiError> {
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Unreadable multipart body: {}", e);
                return Err(detail(StatusCode::BAD_REQUEST, e.body_text()));
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let format = SpreadsheetFormat::from_file_name(field.file_name());
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Cannot read uploaded file: {}", e);
            detail(StatusCode::BAD_REQUEST, e.body_text())
        })?;
        upload = Some((bytes.to_vec(), format));
        break;
    }

    let Some((bytes, format)) = upload else {
        return Err(detail(StatusCode::BAD_REQUEST, "No file uploaded"));
    };

    match u501_import_employees::import_spreadsheet(&state.db, bytes, format).await {
        Ok(report) => Ok(Json(report.to_json())),
        Err(e @ ImportError::Decode(_)) => Err(detail(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e @ ImportError::Commit(_)) => Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}

/// GET /employees/export/
pub async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = a001_employee::service::export_xlsx(&state.db)
        .await
        .map_err(|e| storage_error("Failed to export employees", e))?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"employees_export.xlsx\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
