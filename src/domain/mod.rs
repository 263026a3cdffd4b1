//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod profile;
pub mod user;

pub use profile::Profile;
pub use user::{NewUser, UpdateUser, User, UserResponse, UserWithProfile};
