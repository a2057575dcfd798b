//! File handler implementations

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    handlers::MessageResponse,
    middleware::AuthenticatedUser,
    models::StoredFile,
    services::{FileService, UserService, file_service::Upload},
    state::AppState,
};

use super::response::{FileResponse, content_disposition};

/// Pull the `file` field out of a multipart body
async fn read_upload(mut multipart: Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;

        return Ok(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

async fn to_responses(state: &AppState, files: Vec<StoredFile>) -> AppResult<Vec<FileResponse>> {
    let uploaders = files.iter().filter_map(|f| f.uploaded_by);
    let people = UserService::summaries(state.db(), uploaders).await?;
    Ok(files
        .into_iter()
        .map(|file| FileResponse {
            uploaded_by_user: file.uploaded_by.and_then(|id| people.get(&id).cloned()),
            file,
        })
        .collect())
}

async fn to_response(state: &AppState, file: StoredFile) -> AppResult<FileResponse> {
    let mut responses = to_responses(state, vec![file]).await?;
    responses
        .pop()
        .ok_or_else(|| AppError::not_found("File"))
}

pub async fn upload_image(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<FileResponse>)> {
    let upload = read_upload(multipart).await?;
    let file = FileService::upload_image(
        state.db(),
        &state.config().storage.uploads_path,
        upload,
        &auth_user.id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, file).await?)))
}

pub async fn upload_pdf(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<FileResponse>)> {
    let upload = read_upload(multipart).await?;
    let file = FileService::upload_pdf(
        state.db(),
        &state.config().storage.uploads_path,
        upload,
        &auth_user.id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, file).await?)))
}

pub async fn list_files(State(state): State<AppState>) -> AppResult<Json<Vec<FileResponse>>> {
    let files = FileService::list(state.db()).await?;
    Ok(Json(to_responses(&state, files).await?))
}

pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FileResponse>> {
    let file = FileService::get(state.db(), &id).await?;
    Ok(Json(to_response(&state, file).await?))
}

/// Stored bytes as an attachment
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let download = FileService::download(state.db(), &id).await?;

    let content_type = HeaderValue::from_str(&download.file.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&download.file.original_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}

pub async fn delete_file(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    FileService::delete(state.db(), &auth_user, &id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
