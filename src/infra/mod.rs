//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Local file storage for profile pictures
//! - Unit of Work for transaction management

pub mod db;
pub mod file_store;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, MigrationState, Migrator};
pub use file_store::{FileStore, LocalFileStore};
pub use repositories::{UserRepository, UserStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxFuture, TxProfileRepository, TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use file_store::MockFileStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
