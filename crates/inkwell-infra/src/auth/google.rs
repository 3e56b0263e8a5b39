//! Google sign-in: ID token verification through the tokeninfo endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use inkwell_core::ports::{AuthError, ExternalProfile, IdentityVerifier};

pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client id the token must be issued for. `None` skips the
    /// audience check.
    pub client_id: Option<String>,
    pub tokeninfo_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
        }
    }
}

/// Fields of a tokeninfo reply. Google encodes booleans as strings here.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct GoogleIdentityVerifier {
    client: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleIdentityVerifier {
    pub fn new(config: GoogleConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if config.client_id.is_none() {
            tracing::warn!("GOOGLE_CLIENT_ID not set, Google token audience is not checked");
        }

        Ok(Self { client, config })
    }
}

/// Check a tokeninfo reply and turn it into profile claims.
fn profile_from(info: TokenInfo, client_id: Option<&str>) -> Result<ExternalProfile, AuthError> {
    if let Some(expected) = client_id {
        if info.aud.as_deref() != Some(expected) {
            return Err(AuthError::InvalidToken("token was issued for another client".into()));
        }
    }

    let email = info
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("token has no email".into()))?;

    if info.email_verified.as_deref() != Some("true") {
        return Err(AuthError::InvalidToken("email is not verified".into()));
    }

    let name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    Ok(ExternalProfile {
        email,
        name,
        picture: info.picture,
    })
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<ExternalProfile, AuthError> {
        let response = self
            .client
            .get(&self.config.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::InvalidToken("Google rejected the token".into()));
        }
        if !status.is_success() {
            tracing::warn!(status = %status, "Google tokeninfo request failed");
            return Err(AuthError::Provider(format!("tokeninfo returned {status}")));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        profile_from(info, self.config.client_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(aud: &str, verified: &str) -> TokenInfo {
        serde_json::from_value(serde_json::json!({
            "aud": aud,
            "email": "grace@example.com",
            "email_verified": verified,
            "name": "Grace Hopper",
            "picture": "https://lh3.googleusercontent.com/a/x=s96-c"
        }))
        .unwrap()
    }

    #[test]
    fn test_profile_from_valid_reply() {
        let profile = profile_from(info("client-1", "true"), Some("client-1")).unwrap();
        assert_eq!(profile.email, "grace@example.com");
        assert_eq!(profile.name, "Grace Hopper");
        assert!(profile.picture.is_some());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let result = profile_from(info("someone-else", "true"), Some("client-1"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_unverified_email_rejected() {
        let result = profile_from(info("client-1", "false"), None);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_missing_name_falls_back_to_email() {
        let reply: TokenInfo = serde_json::from_value(serde_json::json!({
            "email": "grace@example.com",
            "email_verified": "true"
        }))
        .unwrap();
        assert_eq!(profile_from(reply, None).unwrap().name, "grace");
    }
}
