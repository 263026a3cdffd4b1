//! Read-side user repository.
//!
//! Profiles are never lazily loaded: every query that needs one joins it
//! explicitly through the `user -> profile` relation.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

use super::entities::{profile, user, ProfileEntity, UserEntity};
use crate::domain::{Profile, User, UserWithProfile};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID together with its profile
    async fn find_with_profile(&self, id: i32) -> AppResult<Option<UserWithProfile>>;

    /// List users with their profiles, ordered by insertion
    async fn list_with_profiles(&self, params: PaginationParams)
        -> AppResult<Vec<UserWithProfile>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn joined((user, profile): (user::Model, Option<profile::Model>)) -> UserWithProfile {
    UserWithProfile::new(User::from(user), profile.map(Profile::from))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_with_profile(&self, id: i32) -> AppResult<Option<UserWithProfile>> {
        let result = UserEntity::find_by_id(id)
            .find_also_related(ProfileEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(joined))
    }

    async fn list_with_profiles(
        &self,
        params: PaginationParams,
    ) -> AppResult<Vec<UserWithProfile>> {
        let rows = UserEntity::find()
            .find_also_related(ProfileEntity)
            .order_by_asc(user::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(joined).collect())
    }
}
