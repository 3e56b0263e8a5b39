//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::SocialLinks;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fullname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: Option<String>,
    #[sea_orm(unique)]
    pub username: String,
    pub profile_img: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub social_links: Json,
    pub google_auth: bool,
    pub total_posts: i64,
    pub total_reads: i64,
    pub joined_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog::Entity")]
    Blog,
}

impl Related<super::blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for inkwell_core::domain::User {
    fn from(model: Model) -> Self {
        let social_links = serde_json::from_value::<SocialLinks>(model.social_links)
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %model.id, error = %e, "Unreadable social links");
                SocialLinks::default()
            });

        Self {
            id: model.id,
            fullname: model.fullname,
            email: model.email,
            password_hash: model.password_hash,
            username: model.username,
            profile_img: model.profile_img,
            bio: model.bio,
            social_links,
            google_auth: model.google_auth,
            total_posts: model.total_posts,
            total_reads: model.total_reads,
            joined_at: model.joined_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<inkwell_core::domain::User> for ActiveModel {
    fn from(user: inkwell_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            fullname: Set(user.fullname),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            username: Set(user.username),
            profile_img: Set(user.profile_img),
            bio: Set(user.bio),
            social_links: Set(serde_json::to_value(&user.social_links).unwrap_or_default()),
            google_auth: Set(user.google_auth),
            total_posts: Set(user.total_posts),
            total_reads: Set(user.total_reads),
            joined_at: Set(user.joined_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
