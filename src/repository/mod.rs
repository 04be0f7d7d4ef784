//! Record store: reader/writer traits and their Diesel implementation.

use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sqlite::SqliteConnection;
use pushkind_common::db::DbPool;

use crate::domain::contract::{Contract, NewContract, UpdateContract};
use crate::domain::credential::{Credential, CredentialKey};
use crate::domain::team::{NewTeamMembership, TeamMembership};
use crate::domain::types::{ContractId, MemberId};
use crate::repository::errors::RepositoryResult;

pub mod contract;
pub mod credential;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod team;

/// Diesel-backed implementation of every store trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|err| {
            log::error!("Failed to get a database connection: {err}");
            err.into()
        })
    }
}

pub trait ContractReader {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>>;
    /// All contracts, newest date first.
    fn list_contracts(&self) -> RepositoryResult<Vec<Contract>>;
}

pub trait ContractWriter {
    fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract>;
    fn update_contract(
        &self,
        id: ContractId,
        updates: &UpdateContract,
    ) -> RepositoryResult<Contract>;
    fn delete_contract(&self, id: ContractId) -> RepositoryResult<()>;
}

pub trait TeamReader {
    fn list_team_members(&self) -> RepositoryResult<Vec<TeamMembership>>;
}

pub trait TeamWriter {
    fn add_team_member(&self, member: &NewTeamMembership) -> RepositoryResult<TeamMembership>;
    fn remove_team_member(&self, id: MemberId) -> RepositoryResult<()>;
}

pub trait CredentialReader {
    fn get_credential(&self, key: CredentialKey) -> RepositoryResult<Option<Credential>>;
}

pub trait CredentialWriter {
    /// Inserts or replaces every credential in a single transaction.
    fn upsert_credentials(&self, credentials: &[Credential]) -> RepositoryResult<()>;
}
