//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{MediaRef, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub birthdate: Option<Date>,
    pub gender: String,
    pub avatar_local: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_public_id: Option<String>,
    pub bio: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            // Columns are written from the enums, unknown values fall back to the defaults
            role: model.role.parse().unwrap_or_default(),
            full_name: model.full_name,
            mobile: model.mobile,
            address: model.address,
            birthdate: model.birthdate,
            gender: model.gender.parse().unwrap_or_default(),
            avatar: MediaRef {
                local_file: model.avatar_local,
                url: model.avatar_url,
                public_id: model.avatar_public_id,
            },
            bio: model.bio,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role.as_str().to_string()),
            full_name: Set(user.full_name),
            mobile: Set(user.mobile),
            address: Set(user.address),
            birthdate: Set(user.birthdate),
            gender: Set(user.gender.as_str().to_string()),
            avatar_local: Set(user.avatar.local_file),
            avatar_url: Set(user.avatar.url),
            avatar_public_id: Set(user.avatar.public_id),
            bio: Set(user.bio),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
