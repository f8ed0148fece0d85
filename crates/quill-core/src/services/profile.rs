//! Self-service profile management.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::media::{Attachments, Upload};
use crate::domain::{Gender, User};
use crate::error::DomainError;
use crate::ports::UserRepository;

/// Editable profile fields. Missing or blank fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    /// `YYYY-MM-DD`.
    pub birthdate: Option<String>,
    pub gender: Option<String>,
}

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    attachments: Arc<Attachments>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, attachments: Arc<Attachments>) -> Self {
        Self { users, attachments }
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: ProfileInput,
    ) -> Result<User, DomainError> {
        let mut user = self.profile(user_id).await?;

        if let Some(full_name) = provided(input.full_name) {
            user.full_name = Some(full_name);
        }
        if let Some(mobile) = provided(input.mobile) {
            user.mobile = Some(mobile);
        }
        if let Some(address) = provided(input.address) {
            user.address = Some(address);
        }
        if let Some(birthdate) = provided(input.birthdate) {
            let date = NaiveDate::parse_from_str(&birthdate, "%Y-%m-%d").map_err(|_| {
                DomainError::Validation("birthdate must be formatted YYYY-MM-DD".into())
            })?;
            user.birthdate = Some(date);
        }
        if let Some(gender) = provided(input.gender) {
            user.gender = gender
                .parse::<Gender>()
                .map_err(DomainError::Validation)?;
        }

        user.touch();
        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(saved)
    }

    /// Replace the avatar. The new image is stored before the old one is removed.
    pub async fn update_avatar(
        &self,
        user_id: Uuid,
        upload: Option<Upload>,
    ) -> Result<User, DomainError> {
        let upload = upload.ok_or_else(|| DomainError::Validation("No file uploaded".into()))?;
        let mut user = self.profile(user_id).await?;

        let replacement = self.attachments.attach(upload).await?;
        let previous = std::mem::replace(&mut user.avatar, replacement);
        self.attachments.discard(&previous).await;

        user.touch();
        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %user_id, "Avatar updated");
        Ok(saved)
    }

    /// Delete the account and its avatar. Authored posts and comments are kept.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), DomainError> {
        let user = self.profile(user_id).await?;

        self.attachments.discard(&user.avatar).await;
        self.users.delete(user_id).await?;

        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}

fn provided(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
