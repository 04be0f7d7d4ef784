//! JSON views of the scoped contract list and the performance summary.

use crate::domain::access::AuthenticatedUser;
use crate::domain::summary::summarize;
use crate::dto::api::{ContractsResponse, SummaryResponse};
use crate::dto::main::{ContractRow, IndexQuery};
use crate::repository::{ContractReader, TeamReader};
use crate::services::ServiceResult;
use crate::services::main::{load_scoped_contracts, parse_filter};

pub fn list_contracts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<ContractsResponse>
where
    R: ContractReader + TeamReader + ?Sized,
{
    let filter = parse_filter(query.range.as_deref());
    let contracts = load_scoped_contracts(repo, user, &filter)?;
    let with_details = user.can_see_client_details();

    Ok(ContractsResponse {
        range: filter.to_string(),
        total: contracts.len(),
        contracts: contracts
            .iter()
            .map(|contract| ContractRow::new(contract, with_details))
            .collect(),
    })
}

pub fn summary<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<SummaryResponse>
where
    R: ContractReader + TeamReader + ?Sized,
{
    let filter = parse_filter(query.range.as_deref());
    let contracts = load_scoped_contracts(repo, user, &filter)?;
    let salespeople = summarize(&contracts);

    Ok(SummaryResponse {
        range: filter.to_string(),
        total_units: salespeople.iter().map(|s| s.total_units).sum(),
        valid_units: salespeople.iter().map(|s| s.valid_units).sum(),
        salespeople,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::fixtures::contract;
    use crate::domain::status::{ContractStatus, Outcome};
    use crate::repository::mock::MockRepository;

    #[test]
    fn summary_totals_cover_every_salesperson() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members().returning(|| Ok(Vec::new()));
        repo.expect_list_contracts().returning(|| {
            Ok(vec![
                contract(1, Some("Ian"), 2, ContractStatus::Simple(Outcome::Ok)),
                contract(2, Some("Pepe"), 3, ContractStatus::Simple(Outcome::KoDistri)),
            ])
        });

        let response = summary(&repo, &AuthenticatedUser::manager(None), IndexQuery::default())
            .expect("summary loads");
        assert_eq!(response.range, "all");
        assert_eq!(response.total_units, 5);
        assert_eq!(response.valid_units, 2);
        assert_eq!(response.salespeople[0].salesperson, "Pepe");
    }

    #[test]
    fn contract_list_hides_client_details_from_agents() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members().returning(|| Ok(Vec::new()));
        repo.expect_list_contracts()
            .returning(|| Ok(vec![contract(1, Some("ian"), 1, ContractStatus::default())]));

        let user = AuthenticatedUser::agent(
            &crate::domain::types::SalespersonName::new("Ian").expect("valid name"),
        );
        let response = list_contracts(&repo, &user, IndexQuery::default()).expect("list loads");
        assert_eq!(response.total, 1);
        assert!(response.contracts[0].client_details.is_none());
    }
}
