use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(NotificationKind::Like),
            other => Err(format!("unknown notification type: {other}")),
        }
    }
}

/// Notification entity - one record per (kind, post, acting user).
///
/// A like is represented by the existence of its notification, so the
/// record doubles as the "liked by" relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub blog_id: Uuid,
    /// Author of the post, who receives the notification.
    pub notification_for: Uuid,
    /// User who performed the action.
    pub user_id: Uuid,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn like(blog_id: Uuid, notification_for: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NotificationKind::Like,
            blog_id,
            notification_for,
            user_id,
            seen: false,
            created_at: Utc::now(),
        }
    }
}
