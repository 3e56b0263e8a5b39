//! User lookup handlers.

use actix_web::{HttpResponse, web};

use inkwell_shared::dto::{AuthorDto, ProfileRequest, ProfileResponse, SearchUsersRequest, UsersResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /search-users
pub async fn search_users(
    state: web::Data<AppState>,
    body: web::Json<SearchUsersRequest>,
) -> AppResult<HttpResponse> {
    let users = state.accounts.search_users(&body.query).await?;
    Ok(HttpResponse::Ok().json(UsersResponse {
        users: users.iter().map(AuthorDto::from).collect(),
    }))
}

/// POST /get-profile
pub async fn get_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let profile = state.accounts.profile(&body.username).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}
