use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request body for login; the identifier matches email or username.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

/// Public part of the user returned to clients. Never carries the hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_private: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_private: user.is_private,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_without_hash() {
        let json = serde_json::to_string(&PublicUser {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            username: "ada".into(),
            is_private: false,
        })
        .unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(json.contains("\"isPrivate\":false"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn login_request_accepts_camel_case_identifier() {
        let body: LoginRequest =
            serde_json::from_str(r#"{"emailOrUsername":"ada","password":"pw"}"#).unwrap();
        assert_eq!(body.email_or_username, "ada");
    }
}
