//! Diesel models for the key/value application configuration table.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::credential::{Credential, CredentialKey};
use crate::domain::types::{NonEmptyString, TypeConstraintError};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::app_config)]
pub struct AppConfig {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::app_config)]
pub struct NewAppConfig<'a> {
    pub key: &'static str,
    pub value: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<AppConfig> for Credential {
    type Error = TypeConstraintError;

    fn try_from(row: AppConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.key.parse::<CredentialKey>()?,
            value: NonEmptyString::new(row.value)?,
        })
    }
}
