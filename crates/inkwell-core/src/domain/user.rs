use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const AVATAR_STYLES: [&str; 2] = ["notionists-neutral", "adventurer-neutral"];

/// Links shown on a user's public profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub website: String,
}

/// User entity - an account and its public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    /// `None` for accounts created through Google sign-in.
    pub password_hash: Option<String>,
    pub username: String,
    pub profile_img: String,
    pub bio: String,
    pub social_links: SocialLinks,
    pub google_auth: bool,
    pub total_posts: i64,
    pub total_reads: i64,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a password-backed account.
    pub fn new(fullname: String, email: String, password_hash: String, username: String) -> Self {
        let profile_img = default_profile_img(&fullname);
        Self::build(fullname, email, Some(password_hash), username, profile_img, false)
    }

    /// Create an account backed by Google identity.
    pub fn new_google(
        fullname: String,
        email: String,
        username: String,
        profile_img: String,
    ) -> Self {
        Self::build(fullname, email, None, username, profile_img, true)
    }

    fn build(
        fullname: String,
        email: String,
        password_hash: Option<String>,
        username: String,
        profile_img: String,
        google_auth: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            fullname,
            email,
            password_hash,
            username,
            profile_img,
            bio: String::new(),
            social_links: SocialLinks::default(),
            google_auth,
            total_posts: 0,
            total_reads: 0,
            joined_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            fullname: self.fullname.clone(),
            username: self.username.clone(),
            profile_img: self.profile_img.clone(),
        }
    }
}

/// The slice of a user that is attached to posts and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub profile_img: String,
}

/// Generated avatar used until the user uploads one.
pub fn default_profile_img(seed: &str) -> String {
    let style = AVATAR_STYLES[seed.len() % AVATAR_STYLES.len()];
    let seed: String = seed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("https://api.dicebear.com/6.x/{style}/svg?seed={seed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_with_zero_counters() {
        let user = User::new(
            "Ada Lovelace".into(),
            "ada@example.com".into(),
            "hash".into(),
            "ada".into(),
        );

        assert_eq!(user.total_posts, 0);
        assert_eq!(user.total_reads, 0);
        assert!(!user.google_auth);
        assert!(user.profile_img.contains("seed=AdaLovelace"));
    }

    #[test]
    fn test_google_user_has_no_password() {
        let user = User::new_google(
            "Ada".into(),
            "ada@example.com".into(),
            "ada".into(),
            "https://img".into(),
        );

        assert!(user.google_auth);
        assert!(user.password_hash.is_none());
    }
}
