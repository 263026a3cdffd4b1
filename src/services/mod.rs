//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod container;
mod user_service;

pub use container::{ServiceContainer, Services};
pub use user_service::{UserManager, UserService};
