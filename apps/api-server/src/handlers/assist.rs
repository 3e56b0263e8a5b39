//! Tag and summary suggestions.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use inkwell_core::service::AssistService;
use inkwell_shared::dto::{GenerateSummaryRequest, GenerateTagsRequest, SummaryResponse, TagsResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn assist(state: &AppState) -> AppResult<Arc<AssistService>> {
    state.assist.clone().ok_or_else(|| {
        AppError::Unavailable("Tag and summary generation is not configured".to_string())
    })
}

/// POST /generate-tags
pub async fn generate_tags(
    state: web::Data<AppState>,
    body: web::Json<GenerateTagsRequest>,
) -> AppResult<HttpResponse> {
    let tags = assist(&state)?.generate_tags(&body.des).await?;
    Ok(HttpResponse::Ok().json(TagsResponse { tags }))
}

/// POST /generate-summary
pub async fn generate_summary(
    state: web::Data<AppState>,
    body: web::Json<GenerateSummaryRequest>,
) -> AppResult<HttpResponse> {
    let summary = assist(&state)?
        .generate_summary(&body.title, &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(SummaryResponse { summary }))
}
