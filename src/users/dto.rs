use serde::{Deserialize, Serialize};

use crate::users::repo_types::{Role, User};

/// Partial update body; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct UserUpdated {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserDeleted {
    pub message: String,
}
