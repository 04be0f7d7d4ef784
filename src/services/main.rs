//! Dashboard page and contract creation.

use std::collections::BTreeSet;

use crate::domain::access::{AuthenticatedUser, Role, scope_contracts};
use crate::domain::contract::Contract;
use crate::domain::period::{TimeFilter, month_buckets, week_buckets};
use crate::domain::summary::summarize;
use crate::domain::team::Roster;
use crate::domain::types::SalespersonName;
use crate::dto::main::{
    ContractRow, IndexPageData, IndexQuery, PeriodLink, contract_type_labels, outcome_labels,
};
use crate::forms::contracts::{AddContractForm, AddContractPayload, MAX_CUPS_PER_CONTRACT};
use crate::repository::{ContractReader, ContractWriter, TeamReader};
use crate::services::{ServiceError, ServiceResult};

/// Reads the wire form of a filter. Malformed input shows everything.
pub fn parse_filter(raw: Option<&str>) -> TimeFilter {
    let raw = raw.unwrap_or_default();
    raw.parse().unwrap_or_else(|err| {
        log::warn!("Ignoring malformed date filter {raw:?}: {err}");
        TimeFilter::All
    })
}

/// Loads the roster snapshot used for this request.
pub fn load_roster<R>(repo: &R) -> ServiceResult<Roster>
where
    R: TeamReader + ?Sized,
{
    let members = repo.list_team_members().map_err(|err| {
        log::error!("Failed to load the roster: {err}");
        err
    })?;
    Ok(Roster::from_memberships(members))
}

/// Contracts within the user's role scope and the selected period.
pub fn load_scoped_contracts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: &TimeFilter,
) -> ServiceResult<Vec<Contract>>
where
    R: ContractReader + TeamReader + ?Sized,
{
    let roster = load_roster(repo)?;
    let contracts = repo.list_contracts().map_err(|err| {
        log::error!("Failed to list contracts: {err}");
        err
    })?;
    Ok(scope_contracts(contracts, filter, user, &roster))
}

/// Builds everything the dashboard shows for the selected period.
pub fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
    years: &BTreeSet<i32>,
) -> ServiceResult<IndexPageData>
where
    R: ContractReader + TeamReader + ?Sized,
{
    let filter = parse_filter(query.range.as_deref());
    let roster = load_roster(repo)?;
    let contracts = repo.list_contracts().map_err(|err| {
        log::error!("Failed to list contracts: {err}");
        err
    })?;
    let contracts = scope_contracts(contracts, &filter, user, &roster);

    let months = month_buckets(years)
        .iter()
        .map(|bucket| PeriodLink::month(bucket, &filter))
        .collect();
    let weeks = match filter.active_month() {
        Some((year, month_index)) => week_buckets(year, month_index)?
            .iter()
            .map(|bucket| PeriodLink::week(bucket, &filter))
            .collect(),
        None => Vec::new(),
    };

    let show_client_details = user.can_see_client_details();
    Ok(IndexPageData {
        range: filter.to_string(),
        summary: summarize(&contracts),
        contracts: contracts
            .iter()
            .map(|contract| ContractRow::new(contract, show_client_details))
            .collect(),
        months,
        weeks,
        salespeople: user
            .assignable_salespeople(&roster)
            .into_iter()
            .map(SalespersonName::into_inner)
            .collect(),
        outcomes: outcome_labels(),
        contract_types: contract_type_labels(),
        can_delete: user.can_delete(),
        show_client_details,
        max_cups: MAX_CUPS_PER_CONTRACT,
    })
}

/// Validates the form and records a contract owned by the resolved salesperson.
///
/// Agents always record for themselves and must still be on a team;
/// managers must pick someone from their roster.
pub fn add_contract<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddContractForm,
) -> ServiceResult<Contract>
where
    R: ContractWriter + TeamReader + ?Sized,
{
    let payload = AddContractPayload::try_from(form).map_err(|err| {
        log::warn!("Rejected contract form: {err}");
        err
    })?;

    let roster = load_roster(repo)?;
    let salesperson = match user.role {
        Role::Agent => {
            let salesperson = SalespersonName::new(user.name.as_str())?;
            if roster.team_of(salesperson.as_str()).is_none() {
                log::warn!("{salesperson} is no longer on any team");
                return Err(ServiceError::Unauthorized);
            }
            salesperson
        }
        Role::TeamManager(_) | Role::Manager => {
            let salesperson = payload
                .salesperson
                .clone()
                .ok_or_else(|| ServiceError::Form("Choose a salesperson".to_string()))?;
            if !user.can_assign(&salesperson, &roster) {
                return Err(ServiceError::Form(format!(
                    "{salesperson} is not in your team"
                )));
            }
            salesperson
        }
    };

    let contract = repo
        .create_contract(&payload.into_domain(salesperson))
        .map_err(|err| {
            log::error!("Failed to add a contract: {err}");
            err
        })?;

    Ok(contract)
}
