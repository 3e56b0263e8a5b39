//! Typed HTTP client for the Inkwell API.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use inkwell_shared::ErrorResponse;
use inkwell_shared::dto::{
    AuthResponse, BlogCard, BlogDetail, BlogResponse, BlogsResponse, CreateBlogRequest,
    CreateBlogResponse, GetBlogRequest, GoogleAuthRequest, LikeRequest, LikeResponse,
    PageRequest, SigninRequest, SignupRequest, UploadUrlResponse,
};

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A signed-in user. Returned by the sign-in calls and passed to calls that
/// need authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub username: String,
    pub fullname: String,
    pub profile_img: String,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            access_token: auth.access_token,
            username: auth.username,
            fullname: auth.fullname,
            profile_img: auth.profile_img,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.client.post(self.url(path)).json(body)
    }

    fn post_as<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> RequestBuilder {
        self.post(path, body).bearer_auth(&session.access_token)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), "API request failed");
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(problem) => Err(ClientError::Api {
                status: status.as_u16(),
                problem,
            }),
            Err(_) => Err(ClientError::Unexpected {
                status: status.as_u16(),
                body,
            }),
        }
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Session, ClientError> {
        let auth: AuthResponse = Self::send(self.post("/signup", request)).await?;
        Ok(auth.into())
    }

    pub async fn signin(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = SigninRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = Self::send(self.post("/signin", &body)).await?;
        Ok(auth.into())
    }

    /// Sign in with an ID token obtained from Google on the client side.
    pub async fn google_auth(&self, id_token: &str) -> Result<Session, ClientError> {
        let body = GoogleAuthRequest {
            access_token: id_token.to_string(),
        };
        let auth: AuthResponse = Self::send(self.post("/google-auth", &body)).await?;
        Ok(auth.into())
    }

    /// Create or update a post. Returns its slug.
    pub async fn create_blog(
        &self,
        session: &Session,
        request: &CreateBlogRequest,
    ) -> Result<String, ClientError> {
        let created: CreateBlogResponse =
            Self::send(self.post_as(session, "/create-blog", request)).await?;
        Ok(created.id)
    }

    /// Fetch a post. Drafts need the author's session.
    pub async fn get_blog(
        &self,
        session: Option<&Session>,
        request: &GetBlogRequest,
    ) -> Result<BlogDetail, ClientError> {
        let builder = match session {
            Some(session) => self.post_as(session, "/get-blog", request),
            None => self.post("/get-blog", request),
        };
        let response: BlogResponse = Self::send(builder).await?;
        Ok(response.blog)
    }

    pub async fn latest_blogs(&self, page: i64) -> Result<Vec<BlogCard>, ClientError> {
        let response: BlogsResponse =
            Self::send(self.post("/latest-blogs", &PageRequest { page })).await?;
        Ok(response.blogs)
    }

    pub async fn trending_blogs(&self) -> Result<Vec<BlogCard>, ClientError> {
        let response: BlogsResponse =
            Self::send(self.client.get(self.url("/trending-blogs"))).await?;
        Ok(response.blogs)
    }

    /// Like the post, or remove the like when already liked.
    pub async fn toggle_like(
        &self,
        session: &Session,
        blog_id: Uuid,
    ) -> Result<LikeResponse, ClientError> {
        Self::send(self.post_as(session, "/like-blog", &LikeRequest { id: blog_id })).await
    }

    /// Presigned URL to `PUT` a banner or inline image to.
    pub async fn upload_url(&self) -> Result<String, ClientError> {
        let response: UploadUrlResponse =
            Self::send(self.client.get(self.url("/get-upload-url"))).await?;
        Ok(response.upload_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response and hand back the raw request text.
    async fn one_shot(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            l.to_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn session() -> Session {
        Session {
            access_token: "tok-123".into(),
            username: "ada".into(),
            fullname: "Ada Lovelace".into(),
            profile_img: "https://img.example.com/a.svg".into(),
        }
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(matches!(
            ApiClient::new("localhost:8080"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(ApiClient::new("http://localhost:8080/").is_ok());
    }

    #[tokio::test]
    async fn test_signin_returns_session() {
        let (base, server) = one_shot(
            "200 OK",
            r#"{"access_token":"jwt","token_type":"Bearer","expires_in":3600,"profile_img":"p","username":"ada","fullname":"Ada Lovelace"}"#,
        )
        .await;

        let client = ApiClient::new(&base).unwrap();
        let session = client.signin("ada@example.com", "Secret12").await.unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.username, "ada");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /signin HTTP/1.1"));
        assert!(request.contains(r#""email":"ada@example.com""#));
    }

    #[tokio::test]
    async fn test_problem_details_become_api_error() {
        let (base, server) = one_shot(
            "403 Forbidden",
            r#"{"type":"about:blank","title":"Forbidden","status":403,"detail":"Incorrect password"}"#,
        )
        .await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.signin("ada@example.com", "bad").await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message(), "Incorrect password");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_blog_sends_bearer_token() {
        let (base, server) = one_shot("200 OK", r#"{"id":"A-title-abc123def456"}"#).await;

        let client = ApiClient::new(&base).unwrap();
        let request = CreateBlogRequest {
            title: "A title".into(),
            draft: true,
            ..CreateBlogRequest::default()
        };
        let slug = client.create_blog(&session(), &request).await.unwrap();
        assert_eq!(slug, "A-title-abc123def456");

        let raw = server.await.unwrap().to_lowercase();
        assert!(raw.contains("authorization: bearer tok-123"));
    }

    #[tokio::test]
    async fn test_non_json_error_is_unexpected() {
        let (base, server) = one_shot("502 Bad Gateway", "upstream down").await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.upload_url().await.unwrap_err();
        assert!(matches!(err, ClientError::Unexpected { status: 502, .. }));
        server.await.unwrap();
    }
}
