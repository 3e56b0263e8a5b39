//! Likes.

use std::sync::Arc;

use uuid::Uuid;

use crate::DomainResult;
use crate::domain::Notification;
use crate::error::{DomainError, RepoError};
use crate::ports::{BlogRepository, NotificationRepository};

/// State of a like after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub liked_by_user: bool,
    pub total_likes: i64,
}

pub struct EngagementService {
    blogs: Arc<dyn BlogRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl EngagementService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            blogs,
            notifications,
        }
    }

    /// Like the post if the user has not, unlike it otherwise.
    ///
    /// The counter only moves after the notification record was actually
    /// created or removed, so concurrent toggles cannot double count.
    pub async fn toggle_like(&self, user_id: Uuid, blog_id: Uuid) -> DomainResult<LikeOutcome> {
        let blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| DomainError::not_found("blog", blog_id.to_string()))?;

        if blog.draft {
            return Err(DomainError::forbidden("you can not like draft blogs"));
        }

        match self.notifications.find_like(blog.id, user_id).await? {
            Some(existing) => match self.notifications.delete(existing.id).await {
                Ok(()) => {
                    let total_likes = self.blogs.increment_likes(blog.id, -1).await?;
                    tracing::debug!(blog_id = %blog.id, user_id = %user_id, "Like removed");
                    Ok(LikeOutcome {
                        liked_by_user: false,
                        total_likes,
                    })
                }
                Err(RepoError::NotFound) => Ok(LikeOutcome {
                    liked_by_user: false,
                    total_likes: blog.total_likes,
                }),
                Err(e) => Err(e.into()),
            },
            None => {
                let like = Notification::like(blog.id, blog.author_id, user_id);
                match self.notifications.insert(like).await {
                    Ok(_) => {
                        let total_likes = self.blogs.increment_likes(blog.id, 1).await?;
                        tracing::debug!(blog_id = %blog.id, user_id = %user_id, "Like added");
                        Ok(LikeOutcome {
                            liked_by_user: true,
                            total_likes,
                        })
                    }
                    Err(RepoError::Constraint(_)) => Ok(LikeOutcome {
                        liked_by_user: true,
                        total_likes: blog.total_likes,
                    }),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    pub async fn is_liked(&self, user_id: Uuid, blog_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .notifications
            .find_like(blog_id, user_id)
            .await?
            .is_some())
    }
}
