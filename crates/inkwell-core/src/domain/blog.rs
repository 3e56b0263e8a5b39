use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::BlogContent;
use super::submission::BlogSubmission;

const SLUG_SUFFIX_LEN: usize = 12;

/// Blog entity - a post, published or draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    /// Public identifier, derived from the title once and never changed.
    pub slug: String,
    pub author_id: Uuid,
    pub title: String,
    pub des: String,
    pub banner: String,
    pub content: BlogContent,
    pub tags: Vec<String>,
    pub draft: bool,
    pub total_reads: i64,
    pub total_likes: i64,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a post from a validated submission with a fresh slug.
    pub fn new(author_id: Uuid, submission: BlogSubmission) -> Self {
        let now = Utc::now();
        let update = BlogUpdate::from(submission);
        Self {
            id: Uuid::new_v4(),
            slug: generate_slug(&update.title),
            author_id,
            title: update.title,
            des: update.des,
            banner: update.banner,
            content: update.content,
            tags: update.tags,
            draft: update.draft,
            total_reads: 0,
            total_likes: 0,
            published_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        !self.draft
    }
}

/// Replacement body for an existing post. The slug is not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogUpdate {
    pub title: String,
    pub des: String,
    pub banner: String,
    pub content: BlogContent,
    pub tags: Vec<String>,
    pub draft: bool,
}

impl From<BlogSubmission> for BlogUpdate {
    fn from(submission: BlogSubmission) -> Self {
        match submission {
            BlogSubmission::Draft(d) => Self {
                title: d.title,
                des: d.des.unwrap_or_default(),
                banner: d.banner.unwrap_or_default(),
                content: d.content.unwrap_or_default(),
                tags: d.tags,
                draft: true,
            },
            BlogSubmission::Published(p) => Self {
                title: p.title,
                des: p.des,
                banner: p.banner,
                content: p.content,
                tags: p.tags,
                draft: false,
            },
        }
    }
}

/// Turn a title into the readable part of a slug: every run of characters
/// outside `[A-Za-z0-9]` becomes a single `-`, with none at either end.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Random alphanumeric string used to make slugs and usernames unique.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn generate_slug(title: &str) -> String {
    let base = slugify(title);
    let suffix = random_suffix(SLUG_SUFFIX_LEN);
    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::DraftBlog;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "Hello-World");
        assert_eq!(slugify("  Rust   & Tokio 101 "), "Rust-Tokio-101");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Café au lait"), "Caf-au-lait");
    }

    #[test]
    fn test_new_blog_slug_has_title_and_suffix() {
        let blog = Blog::new(
            Uuid::new_v4(),
            BlogSubmission::Draft(DraftBlog {
                title: "My First Post".into(),
                ..DraftBlog::default()
            }),
        );

        assert!(blog.slug.starts_with("My-First-Post-"));
        assert_eq!(blog.slug.len(), "My-First-Post-".len() + SLUG_SUFFIX_LEN);
        assert!(blog.draft);
        assert_eq!(blog.total_reads, 0);
    }

    #[test]
    fn test_slugs_differ_for_same_title() {
        let a = generate_slug("Same title");
        let b = generate_slug("Same title");
        assert_ne!(a, b);
    }

    #[test]
    fn test_symbol_only_title_gets_suffix_only() {
        let slug = generate_slug("???");
        assert_eq!(slug.len(), SLUG_SUFFIX_LEN);
    }
}
