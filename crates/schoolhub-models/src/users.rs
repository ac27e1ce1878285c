//! The user directory.
//!
//! Every person who can log in has exactly one [`User`] row. The `role`
//! column is free text: the five [`UserRole`] tags drive routing and
//! authorization, anything else (e.g. `PARENT`) is kept verbatim and
//! treated as an unknown role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::UserId;
use crate::navigation::ProfileKind;

/// Columns needed to check a login. Kept apart from [`User`] so the hash
/// never reaches a response body.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Role tag stored on parent accounts. Not a routable [`UserRole`].
pub const PARENT_ROLE_TAG: &str = "PARENT";

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// The parsed role, or `None` for tags the server does not route.
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }

    /// Email with surrounding whitespace removed; blank counts as absent.
    pub fn email_on_file(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Teacher,
    Staff,
    Student,
    TransportManager,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::Teacher,
        UserRole::Staff,
        UserRole::Student,
        UserRole::TransportManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Teacher => "TEACHER",
            UserRole::Staff => "STAFF",
            UserRole::Student => "STUDENT",
            UserRole::TransportManager => "TRANSPORT_MANAGER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role tags outside [`UserRole::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Roles an administrator may give a staff member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    #[default]
    Teacher,
    Staff,
    TransportManager,
    Admin,
}

impl From<StaffRole> for UserRole {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Teacher => UserRole::Teacher,
            StaffRole::Staff => UserRole::Staff,
            StaffRole::TransportManager => UserRole::TransportManager,
            StaffRole::Admin => UserRole::Admin,
        }
    }
}

/// `GET /api/users/me` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: User,
    /// `None` when the stored role tag is not one the server routes.
    pub role: Option<UserRole>,
    pub profiles: Vec<ProfileKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: &str, email: Option<&str>) -> User {
        User {
            id: UserId::new(),
            username: "jdoe".into(),
            email: email.map(str::to_string),
            first_name: "John".into(),
            last_name: "Doe".into(),
            role: role.into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trips_through_tag() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("transport_manager".parse(), Ok(UserRole::TransportManager));
    }

    #[test]
    fn test_parent_tag_is_unknown() {
        let user = user_with(PARENT_ROLE_TAG, None);
        assert_eq!(user.user_role(), None);
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serde_uses_tags() {
        let json = serde_json::to_string(&UserRole::TransportManager).unwrap();
        assert_eq!(json, r#""TRANSPORT_MANAGER""#);

        let role: StaffRole = serde_json::from_str(r#""ADMIN""#).unwrap();
        assert_eq!(UserRole::from(role), UserRole::Admin);
        assert!(serde_json::from_str::<StaffRole>(r#""STUDENT""#).is_err());
    }

    #[test]
    fn test_staff_role_defaults_to_teacher() {
        assert_eq!(UserRole::from(StaffRole::default()), UserRole::Teacher);
    }

    #[test]
    fn test_user_serializes_role_tag_verbatim() {
        let json = serde_json::to_string(&user_with("PARENT", None)).unwrap();
        assert!(json.contains(r#""role":"PARENT""#));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_blank_email_is_not_on_file() {
        assert_eq!(user_with("STAFF", Some("   ")).email_on_file(), None);
        assert_eq!(user_with("STAFF", None).email_on_file(), None);
        assert_eq!(
            user_with("STAFF", Some(" a@b.io ")).email_on_file(),
            Some("a@b.io")
        );
    }
}
