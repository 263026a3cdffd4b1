//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod profile;
pub mod user;

pub use profile::{ActiveModel as ProfileActiveModel, Entity as ProfileEntity};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity};
