use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{ApiError, NO_FILE_UPLOADED};
use crate::gallery::{
    PhotoStorage, StoredImage, extension_from_filename, generate_file_name, is_allowed_extension,
    is_allowed_mime_type,
};

/// Multipart field that carries the photo.
pub const PHOTO_FIELD: &str = "photo";

pub const TYPE_NOT_ALLOWED: &str = "Only image files are allowed (jpeg, jpg, png, gif)";
pub const EMPTY_FILE: &str = "Uploaded file is empty";
const UPLOAD_FAILED: &str = "Error uploading file";
const LISTING_FAILED: &str = "Error reading images";
const UPLOAD_SUCCEEDED: &str = "File uploaded successfully";

pub struct AppState {
    pub config: AppConfig,
    pub storage: PhotoStorage,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let storage = PhotoStorage::new(config.upload_dir.clone());
        Self { config, storage }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_url: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

struct PhotoUpload {
    original_name: String,
    extension: String,
    bytes: Vec<u8>,
}

/// `POST /api/upload`
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Ok(mut multipart) = multipart else {
        tracing::warn!("upload rejected: request is not multipart");
        return Err(ApiError::validation(NO_FILE_UPLOADED));
    };
    let upload = read_photo(&mut multipart, state.config.max_upload_bytes)
        .await
        .inspect_err(|err| tracing::warn!(reason = %err, "upload rejected"))?;
    let Some(upload) = upload else {
        tracing::warn!("upload rejected: no photo field");
        return Err(ApiError::validation(NO_FILE_UPLOADED));
    };

    let file_name = generate_file_name(
        &upload.original_name,
        upload.bytes.len(),
        &upload.extension,
    );
    state
        .storage
        .put_new(&file_name, &upload.bytes)
        .await
        .map_err(|err| ApiError::internal(UPLOAD_FAILED, &err))?;
    tracing::info!(
        file = %file_name,
        original = %upload.original_name,
        size = upload.bytes.len(),
        "photo stored"
    );

    Ok(Json(UploadResponse {
        success: true,
        image_url: state.storage.public_url(&file_name),
        message: UPLOAD_SUCCEEDED.to_string(),
    }))
}

/// Walks every part; only a single file part named `photo` is accepted.
async fn read_photo(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<PhotoUpload>, ApiError> {
    let mut photo = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error(err, max_bytes))?
    {
        let Some(original_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != PHOTO_FIELD || photo.is_some() {
            return Err(ApiError::validation(format!(
                "Unexpected field: {field_name}"
            )));
        }

        let extension = extension_from_filename(&original_name)
            .filter(|ext| is_allowed_extension(ext));
        let mime_allowed = field.content_type().is_some_and(is_allowed_mime_type);
        let Some(extension) = extension.filter(|_| mime_allowed) else {
            return Err(ApiError::validation(TYPE_NOT_ALLOWED));
        };

        let bytes = read_limited(field, max_bytes).await?;
        if bytes.is_empty() {
            return Err(ApiError::validation(EMPTY_FILE));
        }
        photo = Some(PhotoUpload {
            original_name,
            extension,
            bytes,
        });
    }
    Ok(photo)
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|err| multipart_error(err, max_bytes))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_bytes);
    }
    tracing::debug!(error = %err.body_text(), "malformed multipart body");
    ApiError::validation("Invalid multipart data")
}

fn too_large(max_bytes: usize) -> ApiError {
    const MIB: usize = 1024 * 1024;
    let limit = if max_bytes % MIB == 0 {
        format!("{} MB", max_bytes / MIB)
    } else {
        format!("{max_bytes} bytes")
    };
    ApiError::validation(format!("File too large (max {limit})"))
}

/// `GET /api/images`
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredImage>>, ApiError> {
    let images = state
        .storage
        .list()
        .await
        .map_err(|err| ApiError::internal(LISTING_FAILED, &err))?;
    Ok(Json(images))
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_error_names_the_limit() {
        assert_eq!(
            too_large(5 * 1024 * 1024).to_string(),
            "File too large (max 5 MB)"
        );
        assert_eq!(too_large(1000).to_string(), "File too large (max 1000 bytes)");
    }

    #[test]
    fn upload_response_uses_camel_case() {
        let body = serde_json::to_value(UploadResponse {
            success: true,
            image_url: "/uploads/1-abc.png".to_string(),
            message: UPLOAD_SUCCEEDED.to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": true,
                "imageUrl": "/uploads/1-abc.png",
                "message": "File uploaded successfully",
            })
        );
    }

    #[tokio::test]
    async fn health_reports_ok_with_utc_timestamp() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert!(body.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }
}
