//! Role hierarchy
//!
//! Roles form a fixed total order. Callers authorize against it before
//! invoking the engine; nothing in the engine itself checks roles.

use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner = 0,
    Creator = 1,
    Admin = 2,
}

/// True when `actual` is at least `required` in the hierarchy
pub fn has_role(actual: Role, required: Role) -> bool {
    actual >= required
}

impl Role {
    /// Creating and editing questions
    pub fn can_author(&self) -> bool {
        has_role(*self, Role::Creator)
    }

    /// Changing the role of another account
    pub fn can_manage_roles(&self) -> bool {
        has_role(*self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Creator => "creator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learner" | "user" => Ok(Role::Learner),
            "creator" => Ok(Role::Creator),
            "admin" => Ok(Role::Admin),
            other => Err(QuizError::Parse(format!("unknown role '{}'", other))),
        }
    }
}
