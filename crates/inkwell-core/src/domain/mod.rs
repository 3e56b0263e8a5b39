//! Domain entities - the core business objects.

mod blog;
mod content;
mod listing;
mod notification;
mod submission;
mod user;

pub use blog::{Blog, BlogUpdate, random_suffix, slugify};
pub use content::{BlogContent, Block, BlockKind, ImageFile, ListItem};
pub use listing::{BlogFilter, BlogQuery, BlogSort, Page};
pub use notification::{Notification, NotificationKind};
pub use submission::{
    BlogInput, BlogSubmission, DraftBlog, MAX_DESCRIPTION_CHARS, MAX_TAGS, PublishedBlog,
};
pub use user::{AuthorSummary, SocialLinks, User, default_profile_img};
