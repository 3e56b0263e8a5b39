//! Accounts: signup, sign-in (password and Google), password change, profiles.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, default_profile_img, random_suffix};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    BlogRepository, IdentityVerifier, PasswordService, TokenService, UserRepository,
};
use crate::validation::{validate_email, validate_fullname, validate_password};
use crate::DomainResult;

const USERNAME_SUFFIX_LEN: usize = 5;
const USER_SEARCH_LIMIT: u64 = 50;

/// Signup form fields.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

/// A signed-in user and their access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Public profile with the ids of every post the user owns.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub blogs: Vec<Uuid>,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    blogs: Arc<dyn BlogRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    identity: Option<Arc<dyn IdentityVerifier>>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        Self {
            users,
            blogs,
            passwords,
            tokens,
            identity,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> DomainResult<AuthSession> {
        let fullname = input.fullname.trim().to_string();
        validate_fullname(&fullname)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Duplicate("email already exists".into()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let username = self.generate_username(&input.email).await?;

        let user = User::new(fullname, input.email, password_hash, username);
        let user = self.users.insert(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::Duplicate("email already exists".into()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
        self.session(user)
    }

    pub async fn signin(&self, email: &str, password: &str) -> DomainResult<AuthSession> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::forbidden("email not found"))?;

        let hash = match (&user.password_hash, user.google_auth) {
            (Some(hash), false) => hash,
            _ => {
                return Err(DomainError::forbidden(
                    "Account was created using google. Try logging in with google.",
                ));
            }
        };

        if !self.passwords.verify(password, hash)? {
            return Err(DomainError::forbidden("Incorrect password"));
        }

        self.session(user)
    }

    /// Sign in with a Google ID token, creating the account on first sight.
    pub async fn google_signin(&self, id_token: &str) -> DomainResult<AuthSession> {
        let verifier = self
            .identity
            .as_ref()
            .ok_or_else(|| DomainError::Internal("Google sign-in is not configured".into()))?;

        let profile = verifier.verify(id_token).await?;
        let picture = profile
            .picture
            .map(|p| p.replace("s96-c", "s384-c"))
            .unwrap_or_else(|| default_profile_img(&profile.name));

        if let Some(user) = self.users.find_by_email(&profile.email).await? {
            if !user.google_auth {
                return Err(DomainError::forbidden(
                    "This email was signed up without google. Please log in with password to access the account",
                ));
            }
            return self.session(user);
        }

        let username = self.generate_username(&profile.email).await?;
        let user = User::new_google(profile.name, profile.email, username, picture);
        let user = self.users.insert(user).await?;

        tracing::info!(user_id = %user.id, "User created through Google sign-in");
        self.session(user)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_password(new_password)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id.to_string()))?;

        let hash = match (&user.password_hash, user.google_auth) {
            (Some(hash), false) => hash,
            _ => {
                return Err(DomainError::forbidden(
                    "You can't change account's password because you logged in through google",
                ));
            }
        };

        if !self.passwords.verify(current_password, hash)? {
            return Err(DomainError::forbidden("Incorrect current password"));
        }

        let new_hash = self.passwords.hash(new_password)?;
        self.users.update_password(user.id, &new_hash).await?;
        Ok(())
    }

    pub async fn search_users(&self, query: &str) -> DomainResult<Vec<User>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .users
            .search_by_username(query, USER_SEARCH_LIMIT)
            .await?)
    }

    pub async fn profile(&self, username: &str) -> DomainResult<Profile> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;
        let blogs = self.blogs.ids_by_author(user.id).await?;
        Ok(Profile { user, blogs })
    }

    /// Email local part, with a random suffix when it is already taken.
    async fn generate_username(&self, email: &str) -> DomainResult<String> {
        let base = email.split('@').next().unwrap_or_default().to_string();
        if self.users.username_exists(&base).await? {
            return Ok(format!("{base}{}", random_suffix(USERNAME_SUFFIX_LEN)));
        }
        Ok(base)
    }

    fn session(&self, user: User) -> DomainResult<AuthSession> {
        let access_token = self.tokens.generate_token(user.id)?;
        Ok(AuthSession {
            access_token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }
}
