//! Blog entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::BlogContent;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub des: String,
    pub banner: String,
    /// Editor document, stored as-is.
    #[sea_orm(column_type = "JsonBinary")]
    pub content: Json,
    pub tags: Vec<String>,
    pub draft: bool,
    pub total_reads: i64,
    pub total_likes: i64,
    pub published_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn content_to_json(content: &BlogContent) -> Json {
    serde_json::to_value(content).unwrap_or_default()
}

/// Conversion from SeaORM Model to Domain Blog.
impl From<Model> for inkwell_core::domain::Blog {
    fn from(model: Model) -> Self {
        let content = serde_json::from_value::<BlogContent>(model.content).unwrap_or_else(|e| {
            tracing::warn!(slug = %model.slug, error = %e, "Unreadable blog content");
            BlogContent::default()
        });

        Self {
            id: model.id,
            slug: model.slug,
            author_id: model.author_id,
            title: model.title,
            des: model.des,
            banner: model.banner,
            content,
            tags: model.tags,
            draft: model.draft,
            total_reads: model.total_reads,
            total_likes: model.total_likes,
            published_at: model.published_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Blog to SeaORM ActiveModel.
impl From<inkwell_core::domain::Blog> for ActiveModel {
    fn from(blog: inkwell_core::domain::Blog) -> Self {
        Self {
            id: Set(blog.id),
            slug: Set(blog.slug),
            author_id: Set(blog.author_id),
            title: Set(blog.title),
            des: Set(blog.des),
            banner: Set(blog.banner),
            content: Set(content_to_json(&blog.content)),
            tags: Set(blog.tags),
            draft: Set(blog.draft),
            total_reads: Set(blog.total_reads),
            total_likes: Set(blog.total_likes),
            published_at: Set(blog.published_at.into()),
            updated_at: Set(blog.updated_at.into()),
        }
    }
}
