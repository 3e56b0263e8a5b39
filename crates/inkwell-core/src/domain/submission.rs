//! Create-or-update request bodies, split by draft state.

use super::content::BlogContent;
use crate::error::DomainError;

pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_TAGS: usize = 10;

/// Unvalidated body of a create-or-update request.
#[derive(Debug, Clone, Default)]
pub struct BlogInput {
    /// Slug of the post to update; `None` creates a new post.
    pub id: Option<String>,
    pub title: String,
    pub des: Option<String>,
    pub banner: Option<String>,
    pub content: Option<BlogContent>,
    pub tags: Vec<String>,
    pub draft: bool,
}

/// A draft only needs a title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftBlog {
    pub title: String,
    pub des: Option<String>,
    pub banner: Option<String>,
    pub content: Option<BlogContent>,
    pub tags: Vec<String>,
}

/// A published post carries every field.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedBlog {
    pub title: String,
    pub des: String,
    pub banner: String,
    pub content: BlogContent,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlogSubmission {
    Draft(DraftBlog),
    Published(PublishedBlog),
}

impl BlogSubmission {
    pub fn title(&self) -> &str {
        match self {
            Self::Draft(d) => &d.title,
            Self::Published(p) => &p.title,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft(_))
    }
}

impl TryFrom<BlogInput> for BlogSubmission {
    type Error = DomainError;

    fn try_from(input: BlogInput) -> Result<Self, Self::Error> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title is required"));
        }

        let tags = normalize_tags(input.tags);

        if input.draft {
            return Ok(Self::Draft(DraftBlog {
                title,
                des: input.des.filter(|d| !d.is_empty()),
                banner: input.banner.filter(|b| !b.is_empty()),
                content: input.content,
                tags,
            }));
        }

        let des = input.des.unwrap_or_default();
        if des.is_empty() || des.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(DomainError::validation(format!(
                "description is required and should be under {MAX_DESCRIPTION_CHARS} characters"
            )));
        }

        let banner = input.banner.unwrap_or_default();
        if banner.is_empty() {
            return Err(DomainError::validation("banner is required"));
        }

        let content = input.content.unwrap_or_default();
        if content.is_empty() {
            return Err(DomainError::validation("content is required"));
        }

        if tags.is_empty() || tags.len() > MAX_TAGS {
            return Err(DomainError::validation(format!(
                "tags are required and should be at most {MAX_TAGS}"
            )));
        }

        Ok(Self::Published(PublishedBlog {
            title,
            des,
            banner,
            content,
            tags,
        }))
    }
}

/// Lowercase, trim and dedupe tags, keeping first-seen order.
pub(crate) fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
