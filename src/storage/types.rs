//! Persisted record types
//!
//! This module defines the records that cross the storage boundary:
//! - `Account`: the secret-free profile kept in the current session
//! - `RegisteredAccount`: an account plus its password, as kept in the account list
//! - `Secret`: a password wrapper that never prints its contents
//! - `Role`: the account role (a single fixed value)

use serde::{Deserialize, Serialize};

/// Email of the account seeded on first run
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@healthcare.com";

/// Password of the account seeded on first run
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Role carried by every account
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// A signed-in identity as exposed to the rest of the application
///
/// Has no password field, so a session record built from it cannot leak one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Stable account identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email (unique key, not enforced)
    pub email: String,
    /// Account role
    #[serde(default)]
    pub role: Role,
    /// Avatar image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Account {
    /// Create an admin account without an avatar
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::Admin,
            avatar: None,
        }
    }

    /// Builder method: set the avatar reference
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Plaintext password
///
/// Serializes as a bare string so the persisted list keeps its `"password": "..."`
/// shape, but `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Compare against a candidate password
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An entry of the registered-account list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredAccount {
    #[serde(flatten)]
    pub account: Account,
    pub password: Secret,
}

impl RegisteredAccount {
    pub fn new(account: Account, password: impl Into<Secret>) -> Self {
        Self {
            account,
            password: password.into(),
        }
    }

    /// The account seeded when no list has been persisted yet
    pub fn default_admin() -> Self {
        Self::new(
            Account::new("u_001", "Dr. Admin", DEFAULT_ADMIN_EMAIL)
                .avatar("https://github.com/shadcn.png"),
            DEFAULT_ADMIN_PASSWORD,
        )
    }

    /// Exact match on both email and password
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.account.email == email && self.password.matches(password)
    }

    pub fn email(&self) -> &str {
        &self.account.email
    }

    /// Drop the password, keeping the profile
    pub fn into_account(self) -> Account {
        self.account
    }
}

/// The account list used when nothing valid has been persisted
pub fn default_accounts() -> Vec<RegisteredAccount> {
    vec![RegisteredAccount::default_admin()]
}
