use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse capability tag carried in access-token claims.
///
/// Authorization is a set-membership test against an allowed-role list.
/// There is deliberately no hierarchy here: `Admin` does not implicitly
/// include `User` unless a route enumerates both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    #[default]
    User = 0,
    Admin = 1,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Restore from a database id; unknown ids fall back to `User`
    /// rather than panicking on a bad row.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => Role::User,
            1 => Role::Admin,
            _ => {
                tracing::error!("Invalid Role id: {}, defaulting to user", id);
                Role::User
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
