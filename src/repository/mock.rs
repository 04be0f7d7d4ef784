//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::contract::{Contract, NewContract, UpdateContract};
use crate::domain::credential::{Credential, CredentialKey};
use crate::domain::team::{NewTeamMembership, TeamMembership};
use crate::domain::types::{ContractId, MemberId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ContractReader, ContractWriter, CredentialReader, CredentialWriter, TeamReader, TeamWriter,
};

mock! {
    pub Repository {}

    impl ContractReader for Repository {
        fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>>;
        fn list_contracts(&self) -> RepositoryResult<Vec<Contract>>;
    }

    impl ContractWriter for Repository {
        fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract>;
        fn update_contract(
            &self,
            id: ContractId,
            updates: &UpdateContract,
        ) -> RepositoryResult<Contract>;
        fn delete_contract(&self, id: ContractId) -> RepositoryResult<()>;
    }

    impl TeamReader for Repository {
        fn list_team_members(&self) -> RepositoryResult<Vec<TeamMembership>>;
    }

    impl TeamWriter for Repository {
        fn add_team_member(&self, member: &NewTeamMembership) -> RepositoryResult<TeamMembership>;
        fn remove_team_member(&self, id: MemberId) -> RepositoryResult<()>;
    }

    impl CredentialReader for Repository {
        fn get_credential(&self, key: CredentialKey) -> RepositoryResult<Option<Credential>>;
    }

    impl CredentialWriter for Repository {
        fn upsert_credentials(&self, credentials: &[Credential]) -> RepositoryResult<()>;
    }
}
