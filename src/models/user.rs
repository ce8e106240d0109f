use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A stored account, including its password hash. Never serialize this
/// directly to a client; convert it into a [`PublicUser`] first.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Always stored trimmed and lower-cased.
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
}

/// Sanitized user representation: everything but the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            bio: user.bio,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Partial profile update. Absent fields are left unchanged;
/// `bio: Some("")` clears the bio.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct ProfilePatch {
    #[validate(length(min = 1, max = 100), custom = "super::not_blank")]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    /// Length is checked by the auth service, which reports `WeakPassword`.
    pub password: Option<String>,
}

/// Lower-cases and trims an email so stores can compare exactly.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuu".into(),
            bio: Some("mathematician".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_public_user_has_no_hash() {
        let public = PublicUser::from(user());
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["bio"], "mathematician");
    }

    #[test]
    fn test_profile_patch_validation() {
        assert!(ProfilePatch::default().validate().is_ok());

        let patch = ProfilePatch {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = ProfilePatch {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = ProfilePatch {
            bio: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = ProfilePatch {
            bio: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
