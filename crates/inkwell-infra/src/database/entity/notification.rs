//! Notification entity for SeaORM. `(kind, blog_id, user_id)` is unique.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::NotificationKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub blog_id: Uuid,
    pub notification_for: Uuid,
    pub user_id: Uuid,
    pub seen: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blog::Entity",
        from = "Column::BlogId",
        to = "super::blog::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Blog,
}

impl Related<super::blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for inkwell_core::domain::Notification {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind.parse().unwrap_or(NotificationKind::Like),
            blog_id: model.blog_id,
            notification_for: model.notification_for,
            user_id: model.user_id,
            seen: model.seen,
            created_at: model.created_at.into(),
        }
    }
}

impl From<inkwell_core::domain::Notification> for ActiveModel {
    fn from(notification: inkwell_core::domain::Notification) -> Self {
        Self {
            id: Set(notification.id),
            kind: Set(notification.kind.as_str().to_string()),
            blog_id: Set(notification.blog_id),
            notification_for: Set(notification.notification_for),
            user_id: Set(notification.user_id),
            seen: Set(notification.seen),
            created_at: Set(notification.created_at.into()),
        }
    }
}
