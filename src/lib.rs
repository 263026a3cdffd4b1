//! User Profile API - user accounts with profile pictures
//!
//! A small REST service built with Axum and SeaORM: register users with a
//! profile picture, read them back one at a time or paginated, update their
//! details or picture, and delete them.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities (User, Profile)
//! - **services**: Application use cases
//! - **infra**: Database, migrations, repositories, file storage
//! - **api**: HTTP handlers, extractors, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Profile, User, UserResponse};
pub use errors::{AppError, AppResult};
