use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::credential::{Credential, CredentialKey};
use crate::models::credential::{AppConfig, NewAppConfig};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CredentialReader, CredentialWriter, DieselRepository};

impl CredentialReader for DieselRepository {
    fn get_credential(&self, key: CredentialKey) -> RepositoryResult<Option<Credential>> {
        use crate::schema::app_config;

        let mut conn = self.conn()?;
        let row = app_config::table
            .find(key.as_str())
            .select(AppConfig::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|row| Credential::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }
}

impl CredentialWriter for DieselRepository {
    fn upsert_credentials(&self, credentials: &[Credential]) -> RepositoryResult<()> {
        use crate::schema::app_config;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let rows: Vec<NewAppConfig> = credentials
            .iter()
            .map(|credential| NewAppConfig {
                key: credential.key.as_str(),
                value: credential.value.as_str(),
                updated_at: now,
            })
            .collect();

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            for row in &rows {
                diesel::insert_into(app_config::table)
                    .values(row)
                    .on_conflict(app_config::key)
                    .do_update()
                    .set((
                        app_config::value.eq(excluded(app_config::value)),
                        app_config::updated_at.eq(excluded(app_config::updated_at)),
                    ))
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }
}
