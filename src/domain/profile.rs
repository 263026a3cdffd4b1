//! Profile domain entity.

use serde::{Deserialize, Serialize};

/// Presentation data attached to a user, one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i32,
    /// Path of the stored picture, if one has been uploaded
    pub profile_picture: Option<String>,
    pub user_id: i32,
}

impl Profile {
    /// Picture path, if set
    pub fn picture(&self) -> Option<&str> {
        self.profile_picture.as_deref()
    }
}
