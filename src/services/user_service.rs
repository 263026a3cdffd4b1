//! User service - Registration, lookup, updates and deletion of users.
//!
//! Every mutating operation runs in a single transaction. Picture files are
//! written before the commit and removed best-effort, so a crash between the
//! two can leave an orphaned file but never a dangling record.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MSG_DUPLICATE_IDENTITY;
use crate::domain::{NewUser, Profile, UpdateUser, User, UserWithProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FileStore, UnitOfWork};
use crate::types::PaginationParams;
use crate::with_transaction;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user and its profile with the uploaded picture
    async fn register(&self, new_user: NewUser, picture: Vec<u8>) -> AppResult<User>;

    /// Get a user and its profile by ID
    async fn get_user(&self, id: i32) -> AppResult<UserWithProfile>;

    /// List users in insertion order
    async fn list_users(&self, params: PaginationParams) -> AppResult<Vec<UserWithProfile>>;

    /// Overwrite all user fields
    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User>;

    /// Replace the user's profile picture
    async fn update_profile_photo(&self, id: i32, picture: Vec<u8>) -> AppResult<Profile>;

    /// Delete the user, its profile and its picture
    async fn delete_user(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    files: Arc<dyn FileStore>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, files: Arc<dyn FileStore>) -> Self {
        Self { uow, files }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, new_user: NewUser, picture: Vec<u8>) -> AppResult<User> {
        let files = self.files.clone();

        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            // Advisory only: the unique constraints are what hold under races
            if users.identity_taken(&new_user.email, &new_user.phone).await? {
                return Err(AppError::conflict(MSG_DUPLICATE_IDENTITY));
            }

            let user = users.create(new_user).await?;
            let path = files.save(&picture, user.id).await?;
            ctx.profiles()
                .create(user.id, Some(path))
                .await
                .map(|_| user)
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<UserWithProfile> {
        self.uow
            .users()
            .find_with_profile(id)
            .await?
            .ok_or_not_found()
    }

    async fn list_users(&self, params: PaginationParams) -> AppResult<Vec<UserWithProfile>> {
        self.uow.users().list_with_profiles(params).await
    }

    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User> {
        let user = with_transaction!(self.uow, |ctx| ctx.users().update(id, changes).await)?;

        tracing::info!(user_id = user.id, "User details updated");
        Ok(user)
    }

    async fn update_profile_photo(&self, id: i32, picture: Vec<u8>) -> AppResult<Profile> {
        let files = self.files.clone();

        let profile = with_transaction!(self.uow, |ctx| {
            let user = ctx.users().find_by_id(id).await?.ok_or_not_found()?;
            let profiles = ctx.profiles();

            let previous = profiles
                .find_by_user(user.id)
                .await?
                .and_then(|p| p.profile_picture);
            if let Some(old_path) = previous {
                files.delete(&old_path).await;
            }

            let path = files.save(&picture, user.id).await?;
            profiles.set_picture(user.id, path).await
        })?;

        tracing::info!(user_id = id, "Profile picture updated");
        Ok(profile)
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        let files = self.files.clone();

        with_transaction!(self.uow, |ctx| {
            let user = ctx.users().find_by_id(id).await?.ok_or_not_found()?;
            let profiles = ctx.profiles();

            let picture = profiles
                .find_by_user(user.id)
                .await?
                .and_then(|p| p.profile_picture);
            if let Some(path) = picture {
                files.delete(&path).await;
            }

            // A user without a profile simply has nothing to remove here
            profiles.delete_by_user(user.id).await?;
            ctx.users().delete(user.id).await
        })?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    use crate::infra::{
        MockFileStore, MockUserRepository, TransactionContext, TxFuture, UserRepository,
    };

    fn create_test_user(id: i32) -> User {
        User {
            id,
            full_name: "Test User".to_string(),
            email: format!("user{}@example.com", id),
            password: "plain-password".to_string(),
            phone: format!("555-01{:02}", id),
        }
    }

    fn with_picture(user: User) -> UserWithProfile {
        let profile = Profile {
            id: user.id,
            profile_picture: Some(format!("uploads/profile_pictures/profile_{}.jpg", user.id)),
            user_id: user.id,
        };
        UserWithProfile::new(user, Some(profile))
    }

    /// Test mock for UnitOfWork that wraps a MockUserRepository
    struct TestUnitOfWork {
        user_repo: Arc<MockUserRepository>,
    }

    impl TestUnitOfWork {
        fn new(user_repo: MockUserRepository) -> Self {
            Self {
                user_repo: Arc::new(user_repo),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.user_repo.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            // Transaction not supported in test mock
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    /// Service whose file store must never be touched
    fn service(repo: MockUserRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(
            Arc::new(TestUnitOfWork::new(repo)),
            Arc::new(MockFileStore::new()),
        )
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_with_profile()
            .with(eq(4))
            .times(1)
            .returning(|id| Ok(Some(with_picture(create_test_user(id)))));

        let result = service(repo).get_user(4).await.unwrap();

        assert_eq!(result.user.id, 4);
        assert_eq!(result.user.email, "user4@example.com");
        assert_eq!(
            result.profile_picture(),
            Some("uploads/profile_pictures/profile_4.jpg")
        );
    }

    #[tokio::test]
    async fn test_get_user_without_profile() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_with_profile()
            .returning(|id| Ok(Some(UserWithProfile::new(create_test_user(id), None))));

        let result = service(repo).get_user(2).await.unwrap();

        assert!(result.profile.is_none());
        assert_eq!(result.profile_picture(), None);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_with_profile()
            .with(eq(99))
            .returning(|_| Ok(None));

        let result = service(repo).get_user(99).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_users_forwards_pagination() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_with_profiles()
            .with(eq(PaginationParams::new(2, 2)))
            .times(1)
            .returning(|_| Ok(vec![with_picture(create_test_user(3))]));

        let users = service(repo)
            .list_users(PaginationParams::new(2, 2))
            .await
            .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user.id, 3);
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_with_profiles().returning(|_| Ok(vec![]));

        let users = service(repo)
            .list_users(PaginationParams::default())
            .await
            .unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_register_writes_no_file_when_transaction_fails() {
        // MockFileStore has no expectations: any save would panic
        let result = service(MockUserRepository::new())
            .register(
                NewUser {
                    full_name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                    password: "pw".to_string(),
                    phone: "555-0101".to_string(),
                },
                b"jpeg".to_vec(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_mutations_propagate_transaction_errors() {
        let svc = service(MockUserRepository::new());

        let update = svc
            .update_user(
                1,
                UpdateUser {
                    full_name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                    password: "pw".to_string(),
                    phone: "555-0101".to_string(),
                },
            )
            .await;
        assert!(matches!(update, Err(AppError::Internal(_))));

        let photo = svc.update_profile_photo(1, b"jpeg".to_vec()).await;
        assert!(matches!(photo, Err(AppError::Internal(_))));

        let delete = svc.delete_user(1).await;
        assert!(matches!(delete, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_with_profile()
            .returning(|_| Err(AppError::internal("connection lost")));

        let result = service(repo).get_user(1).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
