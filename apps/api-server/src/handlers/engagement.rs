//! Like handlers.

use actix_web::{HttpResponse, web};

use inkwell_shared::dto::{IsLikedResponse, LikeRequest, LikeResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /like-blog
pub async fn like_blog(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LikeRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .engagement
        .toggle_like(identity.user_id, body.id)
        .await?;
    Ok(HttpResponse::Ok().json(LikeResponse::from(outcome)))
}

/// POST /isliked-by-user
pub async fn is_liked_by_user(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LikeRequest>,
) -> AppResult<HttpResponse> {
    let result = state.engagement.is_liked(identity.user_id, body.id).await?;
    Ok(HttpResponse::Ok().json(IsLikedResponse { result }))
}
