//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Profile;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    /// Stored as given
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
}

/// A user together with its profile, loaded by an explicit join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: Option<Profile>,
}

impl UserWithProfile {
    pub fn new(user: User, profile: Option<Profile>) -> Self {
        Self { user, profile }
    }

    /// Picture path of the profile, if both exist
    pub fn profile_picture(&self) -> Option<&str> {
        self.profile.as_ref().and_then(Profile::picture)
    }
}

/// Data required to create a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Replacement values for every user field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "+15550100")]
    pub phone: String,
    /// Stored picture path, null when no profile photo exists
    #[schema(example = "uploads/profile_pictures/profile_1.jpg")]
    pub profile_picture: Option<String>,
}

impl From<UserWithProfile> for UserResponse {
    fn from(record: UserWithProfile) -> Self {
        let profile_picture = record.profile_picture().map(str::to_string);
        let user = record.user;

        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            profile_picture,
        }
    }
}
