//! Shared access passwords stored in the application configuration table.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{NonEmptyString, TypeConstraintError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKey {
    ManagerPassword,
    CommercialPassword,
}

impl CredentialKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::ManagerPassword => "manager_password",
            CredentialKey::CommercialPassword => "commercial_password",
        }
    }
}

impl Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CredentialKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager_password" => Ok(CredentialKey::ManagerPassword),
            "commercial_password" => Ok(CredentialKey::CommercialPassword),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown credential key: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub key: CredentialKey,
    pub value: NonEmptyString,
}

impl Credential {
    #[must_use]
    pub fn new(key: CredentialKey, value: NonEmptyString) -> Self {
        Self { key, value }
    }

    /// Exact comparison against a candidate password.
    pub fn matches(&self, candidate: &str) -> bool {
        self.value.as_str() == candidate
    }
}
