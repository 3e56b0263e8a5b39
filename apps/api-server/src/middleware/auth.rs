//! Bearer token extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use inkwell_core::ports::{AuthError, TokenClaims};
use uuid::Uuid;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The caller proven by a valid access token. Add it to a handler's arguments
/// to make the route require authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::Internal("application state is not registered".to_string())
    })?;

    let token = bearer_token(req)?;
    let claims = state.tokens.validate_token(token)?;
    Ok(Identity::from(claims))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Identity when a valid token is present, `None` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test};
    use inkwell_core::ports::TokenService;
    use inkwell_core::service::ListingLimits;
    use inkwell_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
    use std::sync::Arc;

    use crate::state::{Adapters, Repositories};

    fn state() -> (AppState, Arc<JwtTokenService>) {
        let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));
        let adapters = Adapters {
            tokens: tokens.clone(),
            passwords: Arc::new(Argon2PasswordService::new()),
            identity: None,
            completion: None,
            uploads: None,
        };
        let state = AppState::build(Repositories::in_memory(), adapters, ListingLimits::default());
        (state, tokens)
    }

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.user_id.to_string())
    }

    async fn maybe(identity: OptionalIdentity) -> HttpResponse {
        match identity.user_id() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .route("/me", web::get().to(whoami))
                    .route("/maybe", web::get().to(maybe)),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_valid_token_yields_identity() {
        let (state, tokens) = state();
        let app = app!(state);
        let user_id = Uuid::new_v4();
        let token = tokens.generate_token(user_id).unwrap();

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, user_id.to_string());
    }

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let (state, _) = state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/me").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["detail"], "Missing authorization header");
    }

    #[actix_rt::test]
    async fn test_garbage_token_is_unauthorized() {
        let (state, _) = state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_optional_identity_tolerates_absence() {
        let (state, _) = state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/maybe")
            .insert_header(("Authorization", "Basic abc"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "anonymous");
    }
}
