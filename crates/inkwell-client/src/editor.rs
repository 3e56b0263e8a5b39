//! Editor state for writing and publishing a post.
//!
//! The editor has two screens. In [`EditorMode::Editor`] the author writes the
//! title, banner and block content; [`EditorStore::begin_publish`] checks that
//! there is something to publish and moves to [`EditorMode::Publish`], where
//! the description and tags are filled in. Either screen can produce a
//! request body: [`EditorStore::save_draft`] or [`EditorStore::publish`].

use thiserror::Error;

use inkwell_core::DomainError;
use inkwell_core::domain::{BlogContent, BlogInput, BlogSubmission, MAX_DESCRIPTION_CHARS, MAX_TAGS};
use inkwell_shared::dto::{BlogDetail, CreateBlogRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Editor,
    Publish,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("title is required")]
    TitleRequired,

    #[error("write something in blog to publish")]
    EmptyContent,

    #[error("you can add max {MAX_TAGS} tags")]
    TooManyTags,

    /// The post failed the same checks the server runs.
    #[error("{0}")]
    Invalid(String),
}

/// The post being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorBlog {
    /// Slug when editing an existing post.
    pub id: Option<String>,
    pub title: String,
    pub banner: String,
    pub content: BlogContent,
    pub des: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EditorStore {
    blog: EditorBlog,
    mode: EditorMode,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an existing post for editing. Its slug is kept so saving
    /// updates the post instead of creating a new one.
    pub fn from_existing(blog: BlogDetail) -> Self {
        Self {
            blog: EditorBlog {
                id: Some(blog.blog_id),
                title: blog.title,
                banner: blog.banner,
                content: blog.content,
                des: blog.des,
                tags: blog.tags,
            },
            mode: EditorMode::Editor,
        }
    }

    pub fn blog(&self) -> &EditorBlog {
        &self.blog
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Titles are single-line; line breaks are dropped.
    pub fn set_title(&mut self, title: &str) {
        self.blog.title = title.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    }

    pub fn set_banner(&mut self, url: impl Into<String>) {
        self.blog.banner = url.into();
    }

    pub fn set_content(&mut self, content: BlogContent) {
        self.blog.content = content;
    }

    /// Input beyond the description limit is cut off, like a `maxlength`
    /// textarea. Line breaks are dropped.
    pub fn set_description(&mut self, des: &str) {
        self.blog.des = des
            .chars()
            .filter(|c| !matches!(c, '\n' | '\r'))
            .take(MAX_DESCRIPTION_CHARS)
            .collect();
    }

    pub fn remaining_description_chars(&self) -> usize {
        MAX_DESCRIPTION_CHARS.saturating_sub(self.blog.des.chars().count())
    }

    /// Add a tag, lowercased and trimmed. Returns `false` when the tag is
    /// empty or already present.
    pub fn add_tag(&mut self, tag: &str) -> Result<bool, EditorError> {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || self.blog.tags.contains(&tag) {
            return Ok(false);
        }
        if self.blog.tags.len() >= MAX_TAGS {
            return Err(EditorError::TooManyTags);
        }
        self.blog.tags.push(tag);
        Ok(true)
    }

    pub fn remove_tag(&mut self, tag: &str) {
        let tag = tag.trim().to_lowercase();
        self.blog.tags.retain(|t| *t != tag);
    }

    /// Move to the publish form. Needs a title and at least one block.
    pub fn begin_publish(&mut self) -> Result<(), EditorError> {
        if self.blog.title.trim().is_empty() {
            return Err(EditorError::TitleRequired);
        }
        if self.blog.content.is_empty() {
            return Err(EditorError::EmptyContent);
        }
        self.mode = EditorMode::Publish;
        Ok(())
    }

    pub fn back_to_editor(&mut self) {
        self.mode = EditorMode::Editor;
    }

    /// Body for saving a draft. Only the title is required.
    pub fn save_draft(&self) -> Result<CreateBlogRequest, EditorError> {
        if self.blog.title.trim().is_empty() {
            return Err(EditorError::TitleRequired);
        }
        Ok(self.request(true))
    }

    /// Body for publishing, checked the way the server checks it.
    pub fn publish(&self) -> Result<CreateBlogRequest, EditorError> {
        let request = self.request(false);
        BlogSubmission::try_from(BlogInput::from(request.clone())).map_err(|e| match e {
            DomainError::Validation(msg) if msg == "title is required" => {
                EditorError::TitleRequired
            }
            DomainError::Validation(msg) => EditorError::Invalid(msg),
            other => EditorError::Invalid(other.to_string()),
        })?;
        Ok(request)
    }

    fn request(&self, draft: bool) -> CreateBlogRequest {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        CreateBlogRequest {
            id: self.blog.id.clone(),
            title: self.blog.title.trim().to_string(),
            des: non_empty(&self.blog.des),
            banner: non_empty(&self.blog.banner),
            content: (!self.blog.content.is_empty()).then(|| self.blog.content.clone()),
            tags: self.blog.tags.clone(),
            draft,
        }
    }
}
