//! Unit of Work pattern implementation.
//!
//! One transaction is opened per mutating request. The closure passed to
//! [`UnitOfWork::transaction`] sees a [`TransactionContext`]; everything done
//! through it commits together or not at all, and the transaction is released
//! on every path.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, ModelTrait, NotSet, QueryFilter, Set, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::entities::{
    profile, user, ProfileActiveModel, ProfileEntity, UserActiveModel, UserEntity,
};
use super::repositories::{UserRepository, UserStore};
use crate::domain::{NewUser, Profile, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock the repositories or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get the read-side user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'a> {
        TxUserRepository { txn: self.txn }
    }

    /// Get profile repository for this transaction
    pub fn profiles(&self) -> TxProfileRepository<'a> {
        TxProfileRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from_write)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    async fn find_model(&self, id: i32) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or_not_found()
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.txn).await?;
        Ok(result.map(User::from))
    }

    /// Whether any user already holds this email or this phone
    pub async fn identity_taken(&self, email: &str, phone: &str) -> AppResult<bool> {
        let by_email = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.txn)
            .await?;
        if by_email.is_some() {
            return Ok(true);
        }

        let by_phone = UserEntity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(self.txn)
            .await?;
        Ok(by_phone.is_some())
    }

    /// Insert a user and return it with its assigned id
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = UserActiveModel {
            id: NotSet,
            full_name: Set(new_user.full_name),
            email: Set(new_user.email),
            password: Set(new_user.password),
            phone: Set(new_user.phone),
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from_write)?;

        Ok(User::from(model))
    }

    /// Overwrite every field of an existing user
    pub async fn update(&self, id: i32, changes: UpdateUser) -> AppResult<User> {
        let mut active: UserActiveModel = self.find_model(id).await?.into();

        active.full_name = Set(changes.full_name);
        active.email = Set(changes.email);
        active.password = Set(changes.password);
        active.phone = Set(changes.phone);

        let model = active
            .update(self.txn)
            .await
            .map_err(AppError::from_write)?;

        Ok(User::from(model))
    }

    /// Delete user by ID
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let model = self.find_model(id).await?;
        model.delete(self.txn).await?;
        Ok(())
    }
}

/// Transaction-aware profile repository.
pub struct TxProfileRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProfileRepository<'a> {
    /// Find the profile owned by a user
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Option<Profile>> {
        let result = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.txn)
            .await?;

        Ok(result.map(Profile::from))
    }

    /// Create a profile for a user
    pub async fn create(&self, user_id: i32, picture: Option<String>) -> AppResult<Profile> {
        let active_model = ProfileActiveModel {
            id: NotSet,
            profile_picture: Set(picture),
            user_id: Set(user_id),
        };

        let model = active_model.insert(self.txn).await?;
        Ok(Profile::from(model))
    }

    /// Set the picture path of the user's profile, creating the profile if missing
    pub async fn set_picture(&self, user_id: i32, picture: String) -> AppResult<Profile> {
        let existing = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.txn)
            .await?;

        let Some(model) = existing else {
            return self.create(user_id, Some(picture)).await;
        };

        let mut active: ProfileActiveModel = model.into();
        active.profile_picture = Set(Some(picture));

        let model = active.update(self.txn).await?;
        Ok(Profile::from(model))
    }

    /// Delete the user's profile. Returns the number of rows removed (0 or 1).
    pub async fn delete_by_user(&self, user_id: i32) -> AppResult<u64> {
        let result = ProfileEntity::delete_many()
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
