use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user record, uniquely identified by its email address
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique identifier of the record
    pub email: String,
    /// Display name, persisted in the `username` column
    #[sqlx(rename = "username")]
    pub name: String,
    /// Stored as given, without hashing
    pub password: String,
    /// Set once when the user is created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user stamped with the current time
    pub fn new(email: String, name: String, password: String) -> Self {
        Self {
            email,
            name,
            password,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_user_new() {
        let before = Utc::now();
        let user = User::new(
            "bari@gmail.com".to_string(),
            "bari".to_string(),
            "1234".to_string(),
        );
        let after = Utc::now();

        assert_eq!(user.email, "bari@gmail.com");
        assert_eq!(user.name, "bari");
        assert_eq!(user.password, "1234");
        assert!(user.created_at >= before && user.created_at <= after);
        assert!(after - user.created_at < Duration::seconds(1));
    }

    #[test]
    fn test_user_json_shape() {
        let user = User::new("a@b.com".to_string(), "n".to_string(), "p".to_string());

        let value = serde_json::to_value(&user).expect("Failed to serialize user");

        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["name"], "n");
        assert_eq!(value["password"], "p");
        assert!(value["created_at"].is_string());
        assert!(value.get("username").is_none());
    }

    #[test]
    fn test_user_deserialize() {
        let json = r#"{
            "email": "a@b.com",
            "name": "n",
            "password": "p",
            "created_at": "2024-01-02T03:04:05Z"
        }"#;

        let user: User = serde_json::from_str(json).expect("Failed to deserialize user");

        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }
}
