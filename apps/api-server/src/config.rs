//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use inkwell_infra::auth::{GoogleConfig, JwtConfig};

#[cfg(feature = "postgres")]
use inkwell_infra::database::DatabaseConfig;

#[cfg(feature = "storage")]
use inkwell_infra::storage::S3Config;

#[cfg(feature = "assist")]
use inkwell_infra::assist::OpenAiConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub google: GoogleConfig,
    #[cfg(feature = "storage")]
    pub storage: Option<S3Config>,
    #[cfg(feature = "assist")]
    pub assist: Option<OpenAiConfig>,
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    var(key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = var("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 100),
            min_connections: parse_or("DB_MIN_CONNECTIONS", 10),
        });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: var("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_hours: parse_or("JWT_EXPIRATION_HOURS", jwt_defaults.expiration_hours),
            issuer: var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let google = GoogleConfig {
            client_id: var("GOOGLE_CLIENT_ID"),
            ..GoogleConfig::default()
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            jwt,
            google,
            #[cfg(feature = "storage")]
            storage: Self::storage_from_env(),
            #[cfg(feature = "assist")]
            assist: Self::assist_from_env(),
        }
    }

    /// Present only when the bucket and both credential halves are set.
    #[cfg(feature = "storage")]
    fn storage_from_env() -> Option<S3Config> {
        Some(S3Config {
            bucket: var("AWS_BUCKET_NAME")?,
            region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: var("AWS_ACCESS_KEY_ID")?,
            secret_access_key: var("AWS_SECRET_ACCESS_KEY")?,
            session_token: var("AWS_SESSION_TOKEN"),
            endpoint_url: var("S3_ENDPOINT_URL"),
            expires_secs: inkwell_infra::storage::UPLOAD_URL_EXPIRES_SECS,
        })
    }

    #[cfg(feature = "assist")]
    fn assist_from_env() -> Option<OpenAiConfig> {
        let defaults = OpenAiConfig::default();
        Some(OpenAiConfig {
            api_key: var("OPENAI_API_KEY")?,
            base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: var("OPENAI_MODEL").unwrap_or(defaults.model),
            ..defaults
        })
    }
}
