use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use log::info;

use crate::dispatch::dispatch;
use crate::error::AppError;
use crate::gateway::SmsGateway;
use crate::ingest::parse_appointments;
use crate::types::{SendSmsRequest, StatusResponse, UploadCsvResponse};

pub const UPLOAD_FIELD: &str = "file";

pub struct AppState {
    pub gateway: Arc<dyn SmsGateway>,
    pub sender: String,
}

pub async fn root() -> impl IntoResponse {
    Json(StatusResponse {
        message: "HeadsUp backend is running!".to_string(),
    })
}

pub async fn upload_csv(mut multipart: Multipart) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(AppError::bad_multipart)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let contents = field.bytes().await.map_err(AppError::bad_multipart)?;
        let size = contents.len();
        // Uploads are unbounded, so parse off the async workers.
        let appointments =
            tokio::task::spawn_blocking(move || parse_appointments(&contents)).await??;

        info!(
            "Parsed {} appointments from {} ({} bytes)",
            appointments.len(),
            file_name,
            size
        );
        return Ok(Json(UploadCsvResponse { appointments }));
    }

    Err(AppError::BadRequest(anyhow!(
        "Missing `{}` field in upload",
        UPLOAD_FIELD
    )))
}

pub async fn send_sms(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendSmsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = dispatch(
        state.gateway.as_ref(),
        &state.sender,
        &req.delay,
        &req.appointments,
    )
    .await;

    Ok(Json(report.into_response()))
}
