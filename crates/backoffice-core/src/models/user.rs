use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// The signed-in account, as returned by login and persisted under `userInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Body of a successful `POST /api/users/login`.
///
/// The API returns the user fields next to the token rather than nested.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserInfo,
}

/// An account as listed on the users screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    pub fn role_label(&self) -> &'static str {
        if self.is_admin {
            "Admin"
        } else {
            "User"
        }
    }
}

impl Record for AdminUser {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update payload for `/api/admin/users`.
///
/// `password` is left out of the JSON entirely when unset, so an edit that
/// doesn't touch the password keeps the old one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_flattens_user_fields() {
        let json = r#"{"token":"abc.def.ghi","_id":"1","name":"Admin","isAdmin":true}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "abc.def.ghi");
        assert_eq!(resp.user.id, "1");
        assert_eq!(resp.user.name, "Admin");
        assert_eq!(resp.user.email, "");
        assert!(resp.user.is_admin);
    }

    #[test]
    fn test_user_info_missing_admin_flag_is_not_admin() {
        let user: UserInfo =
            serde_json::from_str(r#"{"_id":"7","name":"Staff","email":"s@example.com"}"#).unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn test_user_input_omits_empty_password() {
        let input = UserInput {
            name: "Staff".to_string(),
            email: "s@example.com".to_string(),
            password: None,
            is_admin: false,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["isAdmin"], false);
    }
}
