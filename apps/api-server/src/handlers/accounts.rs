//! Account handlers: signup, sign-in, password change.

use actix_web::{HttpResponse, web};

use inkwell_core::service::SignupInput;
use inkwell_shared::dto::{
    AuthResponse, ChangePasswordRequest, GoogleAuthRequest, SigninRequest, SignupRequest,
    StatusResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .accounts
        .signup(SignupInput {
            fullname: req.fullname,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

/// POST /signin
pub async fn signin(
    state: web::Data<AppState>,
    body: web::Json<SigninRequest>,
) -> AppResult<HttpResponse> {
    let session = state.accounts.signin(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

/// POST /google-auth
pub async fn google_auth(
    state: web::Data<AppState>,
    body: web::Json<GoogleAuthRequest>,
) -> AppResult<HttpResponse> {
    let session = state.accounts.google_signin(&body.access_token).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

/// POST /change-password
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .change_password(identity.user_id, &body.current_password, &body.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(StatusResponse {
        status: "password changed".to_string(),
    }))
}
