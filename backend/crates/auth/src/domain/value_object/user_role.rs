use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    #[display("user")]
    User,
    #[display("admin")]
    Admin,
    #[display("influencer")]
    Influencer,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Admin => "admin",
            Influencer => "influencer",
        }
    }

    /// Strict parse for caller input
    pub fn parse(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "user" => Some(User),
            "admin" => Some(Admin),
            "influencer" => Some(Influencer),
            _ => None,
        }
    }

    /// Lenient parse for stored values: anything unknown reads as `User`
    pub fn from_db(code: &str) -> Self {
        Self::parse(code).unwrap_or_else(|| {
            tracing::warn!(role = %code, "Unknown stored role, treating as user");
            UserRole::User
        })
    }
}
