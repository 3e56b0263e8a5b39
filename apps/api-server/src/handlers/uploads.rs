//! Presigned image upload URL.

use actix_web::{HttpResponse, web};

use inkwell_core::ports::StorageError;
use inkwell_shared::dto::UploadUrlResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /get-upload-url
pub async fn get_upload_url(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let signer = state.uploads.as_ref().ok_or(StorageError::NotConfigured)?;
    let upload_url = signer.upload_url()?;
    Ok(HttpResponse::Ok().json(UploadUrlResponse { upload_url }))
}
