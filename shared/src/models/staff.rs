//! Staff Account Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Staff,
}

impl Default for Role {
    fn default() -> Self {
        Self::Staff
    }
}

impl Role {
    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Manager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Staff account as persisted (password hash included)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAccount {
    pub id: String,
    pub username: String,
    pub display_name: String,
    /// argon2 password hash; never exposed through the API
    pub hash_pass: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Staff view returned by the API (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<&StaffAccount> for StaffInfo {
    fn from(a: &StaffAccount) -> Self {
        Self {
            id: a.id.clone(),
            username: a.username.clone(),
            display_name: a.display_name.clone(),
            role: a.role,
            is_active: a.is_active,
        }
    }
}
