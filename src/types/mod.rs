//! Shared types for DRY compliance.

mod pagination;
mod response;

pub use pagination::PaginationParams;
pub use response::MessageResponse;
