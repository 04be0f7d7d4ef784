//! Status, notes and deletion of existing contracts, plus the CSV export.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::access::AuthenticatedUser;
use crate::domain::contract::{Contract, UpdateContract};
use crate::domain::period::TimeFilter;
use crate::domain::status::{ContractStatus, reconcile};
use crate::domain::types::{ContractId, SalespersonName};
use crate::forms::contracts::{DeleteContractForm, StatusChange, UpdateNotesForm, UpdateStatusForm};
use crate::repository::{ContractReader, ContractWriter, TeamReader};
use crate::services::main::{load_roster, load_scoped_contracts};
use crate::services::{ServiceError, ServiceResult};

pub const CSV_HEADER: &str = "Date,Client,Type,Status,Status Details,CUPS,Salesperson";

/// Loads a contract and checks it is within the user's scope.
fn load_accessible_contract<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: ContractId,
) -> ServiceResult<Contract>
where
    R: ContractReader + TeamReader + ?Sized,
{
    let contract = repo
        .get_contract_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load contract {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let roster = load_roster(repo)?;
    let owner = contract.salesperson.as_ref().map(SalespersonName::as_str);
    if !user.can_access(owner, &roster) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(contract)
}

/// Applies a simple status or a reconciled distribution to a contract.
pub fn update_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: UpdateStatusForm,
) -> ServiceResult<Contract>
where
    R: ContractReader + ContractWriter + TeamReader + ?Sized,
{
    let id = ContractId::new(id)?;
    let change = StatusChange::try_from(form)?;
    let contract = load_accessible_contract(repo, user, id)?;

    let status = match change {
        StatusChange::Simple(outcome) => ContractStatus::Simple(outcome),
        StatusChange::Split(distribution) => {
            reconcile(contract.cups_count, &distribution).into_status()?
        }
    };

    let updated = repo
        .update_contract(id, &UpdateContract::status(status))
        .map_err(|err| {
            log::error!("Failed to update status of contract {id}: {err}");
            err
        })?;
    Ok(updated)
}

/// Replaces the notes of a contract; blank notes clear them.
pub fn update_notes<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: UpdateNotesForm,
) -> ServiceResult<Contract>
where
    R: ContractReader + ContractWriter + TeamReader + ?Sized,
{
    let id = ContractId::new(id)?;
    load_accessible_contract(repo, user, id)?;

    let updated = repo
        .update_contract(id, &UpdateContract::notes(form.notes()))
        .map_err(|err| {
            log::error!("Failed to update notes of contract {id}: {err}");
            err
        })?;
    Ok(updated)
}

/// Deletes a contract. Managers only, and only with explicit confirmation.
pub fn delete_contract<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: DeleteContractForm,
) -> ServiceResult<()>
where
    R: ContractReader + ContractWriter + TeamReader + ?Sized,
{
    if !user.can_delete() {
        return Err(ServiceError::Unauthorized);
    }
    form.ensure_confirmed()?;

    let id = ContractId::new(id)?;
    load_accessible_contract(repo, user, id)?;

    repo.delete_contract(id).map_err(|err| {
        log::error!("Failed to delete contract {id}: {err}");
        err
    })?;
    Ok(())
}

/// A rendered CSV attachment.
#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub body: Vec<u8>,
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("contracts_export_{}.csv", today.format("%Y-%m-%d"))
}

fn status_details_cell(status: &ContractStatus) -> ServiceResult<String> {
    match status.details() {
        Some(distribution) => {
            let json = serde_json::to_string(distribution)
                .map_err(|e| ServiceError::Internal(format!("status details: {e}")))?;
            Ok(json.replace('"', "'"))
        }
        None => Ok(String::new()),
    }
}

/// Writes the header line unquoted and every data cell double-quoted.
pub fn write_csv(contracts: &[Contract]) -> ServiceResult<Vec<u8>> {
    let mut body = Vec::with_capacity(CSV_HEADER.len() + 1);
    body.extend_from_slice(CSV_HEADER.as_bytes());
    body.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(body);

    for contract in contracts {
        writer
            .write_record([
                contract.date.format("%Y-%m-%d").to_string(),
                contract.client_name.to_string(),
                contract.contract_type.to_string(),
                contract.status.summary_label(),
                status_details_cell(&contract.status)?,
                contract.cups_count.to_string(),
                contract
                    .salesperson
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ])
            .map_err(|e| ServiceError::Internal(format!("csv: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| ServiceError::Internal(format!("csv: {e}")))
}

/// Exports the contracts the user currently sees. An empty export is refused.
pub fn export_contracts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: &TimeFilter,
    today: NaiveDate,
) -> ServiceResult<CsvExport>
where
    R: ContractReader + TeamReader + ?Sized,
{
    let contracts = load_scoped_contracts(repo, user, filter)?;
    if contracts.is_empty() {
        return Err(ServiceError::Form("No contracts to export!".to_string()));
    }

    Ok(CsvExport {
        filename: export_filename(today),
        body: write_csv(&contracts)?,
    })
}

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::domain::fixtures::contract;
    use crate::domain::status::{Distribution, Outcome};

    #[test]
    fn csv_quotes_every_cell_and_flattens_details() {
        let simple = contract(1, Some("Ian"), 2, ContractStatus::Simple(Outcome::Ok));
        let split = contract(
            2,
            None,
            3,
            ContractStatus::Distributed(Distribution::from_counts([
                (Outcome::Ok, 2),
                (Outcome::KoDistri, 1),
            ])),
        );

        let body = write_csv(&[simple, split]).expect("csv renders");
        let text = String::from_utf8(body).expect("utf-8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            r#""2025-01-10","Client","Solluz","OK","","2","Ian""#
        );
        assert_eq!(
            lines[2],
            r#""2025-01-10","Client","Solluz","VARIOS","{'OK':2,'KO DISTRI':1}","3","""#
        );
    }

    #[test]
    fn filename_carries_export_date() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date");
        assert_eq!(export_filename(today), "contracts_export_2025-11-03.csv");
    }
}
