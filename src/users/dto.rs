use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::User;

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for user registration. Missing fields are rejected by the
/// handler, not the JSON extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password: String,
}

/// Profile changes from the owning user. Absent or empty fields keep the
/// stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_authorized: bool,
    pub is_employee: bool,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            is_admin: u.is_admin,
            is_authorized: u.is_authorized,
            is_employee: u.is_employee,
        }
    }
}

/// Registration response: the public user plus surname.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    #[serde(flatten)]
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

impl From<&User> for RegisteredUser {
    fn from(u: &User) -> Self {
        Self {
            user: PublicUser::from(u),
            surname: u.surname.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
