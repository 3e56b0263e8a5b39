//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::domain::{AuthorSummary, BlogContent, BlogInput, SocialLinks, User};
use inkwell_core::service::{AuthSession, BlogView, LikeOutcome, Profile, SearchCriteria};

fn first_page() -> i64 {
    1
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

/// Request to sign in with email and password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Request to sign in with a Google ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAuthRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(alias = "currentPassword")]
    pub current_password: String,
    #[serde(alias = "newPassword")]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Response containing the access token and the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub profile_img: String,
    pub username: String,
    pub fullname: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in.max(0) as u64,
            profile_img: session.user.profile_img,
            username: session.user.username,
            fullname: session.user.fullname,
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Public author/user card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub fullname: String,
    pub username: String,
    pub profile_img: String,
}

impl From<&AuthorSummary> for AuthorDto {
    fn from(author: &AuthorSummary) -> Self {
        Self {
            fullname: author.fullname.clone(),
            username: author.username.clone(),
            profile_img: author.profile_img.clone(),
        }
    }
}

impl From<&User> for AuthorDto {
    fn from(user: &User) -> Self {
        Self {
            fullname: user.fullname.clone(),
            username: user.username.clone(),
            profile_img: user.profile_img.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<AuthorDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub username: String,
}

/// Public profile. Email, password hash and sign-in method are not exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub profile_img: String,
    pub bio: String,
    pub social_links: SocialLinks,
    pub total_posts: i64,
    pub total_reads: i64,
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
    pub blogs: Vec<Uuid>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let user = profile.user;
        Self {
            id: user.id,
            fullname: user.fullname,
            username: user.username,
            profile_img: user.profile_img,
            bio: user.bio,
            social_links: user.social_links,
            total_posts: user.total_posts,
            total_reads: user.total_reads,
            joined_at: user.joined_at,
            blogs: profile.blogs,
        }
    }
}

// ---------------------------------------------------------------------------
// Blogs
// ---------------------------------------------------------------------------

/// Create-or-update body. `draft` decides which fields are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    /// Slug of an existing post to update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub des: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub content: Option<BlogContent>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
}

impl From<CreateBlogRequest> for BlogInput {
    fn from(req: CreateBlogRequest) -> Self {
        Self {
            id: req.id,
            title: req.title,
            des: req.des,
            banner: req.banner,
            content: req.content,
            tags: req.tags,
            draft: req.draft,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogResponse {
    /// Slug of the stored post.
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBlogRequest {
    pub blog_id: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub mode: Option<String>,
}

impl GetBlogRequest {
    pub fn is_edit_mode(&self) -> bool {
        self.mode.as_deref() == Some("edit")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDto {
    pub total_reads: i64,
    pub total_likes: i64,
}

/// A full post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogDetail {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub blog_id: String,
    pub title: String,
    pub des: String,
    pub banner: String,
    pub content: BlogContent,
    pub tags: Vec<String>,
    pub draft: bool,
    pub activity: ActivityDto,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    pub author: AuthorDto,
}

impl From<BlogView> for BlogDetail {
    fn from(view: BlogView) -> Self {
        let author = AuthorDto::from(&view.author);
        let blog = view.blog;
        Self {
            id: blog.id,
            blog_id: blog.slug,
            title: blog.title,
            des: blog.des,
            banner: blog.banner,
            content: blog.content,
            tags: blog.tags,
            draft: blog.draft,
            activity: ActivityDto {
                total_reads: blog.total_reads,
                total_likes: blog.total_likes,
            },
            published_at: blog.published_at,
            author,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub blog: BlogDetail,
}

/// A post as shown in listings, without its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogCard {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub blog_id: String,
    pub title: String,
    pub des: String,
    pub banner: String,
    pub tags: Vec<String>,
    pub activity: ActivityDto,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    pub author: AuthorDto,
}

impl From<BlogView> for BlogCard {
    fn from(view: BlogView) -> Self {
        let author = AuthorDto::from(&view.author);
        let blog = view.blog;
        Self {
            id: blog.id,
            blog_id: blog.slug,
            title: blog.title,
            des: blog.des,
            banner: blog.banner,
            tags: blog.tags,
            activity: ActivityDto {
                total_reads: blog.total_reads,
                total_likes: blog.total_likes,
            },
            published_at: blog.published_at,
            author,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogsResponse {
    pub blogs: Vec<BlogCard>,
}

impl From<Vec<BlogView>> for BlogsResponse {
    fn from(views: Vec<BlogView>) -> Self {
        Self {
            blogs: views.into_iter().map(BlogCard::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "first_page")]
    pub page: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchBlogsRequest {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub author: Option<Uuid>,
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub eliminate_blog: Option<String>,
}

impl SearchBlogsRequest {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            tag: self.tag.clone(),
            query: self.query.clone(),
            author: self.author,
            exclude: self.eliminate_blog.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(rename = "totalDocs")]
    pub total_docs: u64,
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRequest {
    /// Internal id of the post (`_id` of a blog).
    #[serde(rename = "_id")]
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked_by_user: bool,
    pub total_likes: i64,
}

impl From<LikeOutcome> for LikeResponse {
    fn from(outcome: LikeOutcome) -> Self {
        Self {
            liked_by_user: outcome.liked_by_user,
            total_likes: outcome.total_likes,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IsLikedResponse {
    pub result: bool,
}

// ---------------------------------------------------------------------------
// Assist and uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTagsRequest {
    pub des: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSummaryRequest {
    #[serde(default)]
    pub title: String,
    pub content: BlogContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
}
