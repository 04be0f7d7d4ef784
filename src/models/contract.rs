//! Diesel models for stored contracts.
//!
//! A contract status is persisted across two nullable columns: `status`
//! holds a plain outcome label and `status_details` holds a JSON object of
//! outcome counts. Exactly one of them is set on write.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::contract::{
    Contract as DomainContract, ContractType, NewContract as DomainNewContract,
    UpdateContract as DomainUpdateContract,
};
use crate::domain::status::{ContractStatus, Distribution, Outcome};
use crate::domain::types::{
    Address, ClientName, ContractId, ContractNotes, CupsCode, CupsCount, Iban, NationalId,
    PhoneNumber, SalespersonName, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contracts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::contract::Contract`].
pub struct Contract {
    pub id: i32,
    pub date: NaiveDate,
    pub client_name: String,
    pub dni: String,
    pub phone: String,
    pub address: String,
    pub iban: String,
    pub contract_type: String,
    pub cups_count: i32,
    pub contract_ids: String,
    pub salesperson: Option<String>,
    pub status: Option<String>,
    pub status_details: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contracts)]
/// Insertable form of [`Contract`].
pub struct NewContract<'a> {
    pub date: NaiveDate,
    pub client_name: &'a str,
    pub dni: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub iban: &'a str,
    pub contract_type: String,
    pub cups_count: i32,
    pub contract_ids: String,
    pub salesperson: &'a str,
    pub status: Option<String>,
    pub status_details: Option<String>,
    pub notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = crate::schema::contracts)]
/// Partial update of a [`Contract`]. Outer `None` skips the column,
/// `Some(None)` writes NULL.
pub struct UpdateContract {
    pub status: Option<Option<String>>,
    pub status_details: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Splits a status into its `(status, status_details)` column values.
pub fn encode_status(
    status: &ContractStatus,
) -> Result<(Option<String>, Option<String>), serde_json::Error> {
    match status {
        ContractStatus::Simple(outcome) => Ok((Some(outcome.to_string()), None)),
        ContractStatus::Distributed(distribution) => {
            Ok((None, Some(serde_json::to_string(distribution)?)))
        }
    }
}

/// Rebuilds a status from its column values. Details take precedence over
/// the plain label; a row with neither reads as `PENDIENTE`.
pub fn decode_status(
    status: Option<&str>,
    status_details: Option<&str>,
) -> Result<ContractStatus, TypeConstraintError> {
    if let Some(raw) = status_details.filter(|raw| !raw.trim().is_empty()) {
        let distribution: Distribution = serde_json::from_str(raw)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("status details: {e}")))?;
        if !distribution.is_empty() {
            return Ok(ContractStatus::Distributed(distribution));
        }
    }
    match status.map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => Ok(ContractStatus::Simple(Outcome::from(label))),
        None => Ok(ContractStatus::default()),
    }
}

fn encode_codes(codes: &[CupsCode]) -> Result<String, serde_json::Error> {
    let raw: Vec<&str> = codes.iter().map(CupsCode::as_str).collect();
    serde_json::to_string(&raw)
}

impl TryFrom<Contract> for DomainContract {
    type Error = TypeConstraintError;

    fn try_from(contract: Contract) -> Result<Self, Self::Error> {
        let raw_codes: Vec<String> = serde_json::from_str(&contract.contract_ids)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("contract ids: {e}")))?;
        let status = decode_status(
            contract.status.as_deref(),
            contract.status_details.as_deref(),
        )?;

        Ok(Self {
            id: ContractId::try_from(contract.id)?,
            date: contract.date,
            client_name: ClientName::new(contract.client_name)?,
            dni: NationalId::new(contract.dni)?,
            phone: PhoneNumber::new(contract.phone)?,
            address: Address::new(contract.address)?,
            iban: Iban::new(contract.iban)?,
            contract_type: contract.contract_type.parse::<ContractType>()?,
            cups_count: CupsCount::try_from(contract.cups_count)?,
            contract_ids: raw_codes
                .into_iter()
                .map(CupsCode::new)
                .collect::<Result<Vec<_>, _>>()?,
            salesperson: contract
                .salesperson
                .and_then(|name| SalespersonName::new(name).ok()),
            status,
            notes: contract.notes.and_then(ContractNotes::optional),
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        })
    }
}

impl<'a> TryFrom<&'a DomainNewContract> for NewContract<'a> {
    type Error = serde_json::Error;

    fn try_from(contract: &'a DomainNewContract) -> Result<Self, Self::Error> {
        let (status, status_details) = encode_status(&contract.status)?;
        let now = Utc::now().naive_utc();
        Ok(Self {
            date: contract.date,
            client_name: contract.client_name.as_str(),
            dni: contract.dni.as_str(),
            phone: contract.phone.as_str(),
            address: contract.address.as_str(),
            iban: contract.iban.as_str(),
            contract_type: contract.contract_type.to_string(),
            cups_count: i32::from(contract.cups_count),
            contract_ids: encode_codes(&contract.contract_ids)?,
            salesperson: contract.salesperson.as_str(),
            status,
            status_details,
            notes: contract.notes.as_ref().map(ContractNotes::as_str),
            created_at: now,
            updated_at: now,
        })
    }
}

impl TryFrom<&DomainUpdateContract> for UpdateContract {
    type Error = serde_json::Error;

    fn try_from(update: &DomainUpdateContract) -> Result<Self, Self::Error> {
        let mut changeset = UpdateContract {
            updated_at: Some(Utc::now().naive_utc()),
            ..UpdateContract::default()
        };
        if let Some(status) = &update.status {
            let (label, details) = encode_status(status)?;
            changeset.status = Some(label);
            changeset.status_details = Some(details);
        }
        if let Some(notes) = &update.notes {
            changeset.notes = Some(notes.as_ref().map(|n| n.as_str().to_string()));
        }
        Ok(changeset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Contract {
        let now = Utc::now().naive_utc();
        Contract {
            id: 7,
            date: NaiveDate::from_ymd_opt(2025, 2, 3).expect("valid date"),
            client_name: "Maria".into(),
            dni: "12345678z".into(),
            phone: "+34612345678".into(),
            address: "Calle Sol 2".into(),
            iban: "ES91 2100 0418 4502 0005 1332".into(),
            contract_type: "Podo Energia".into(),
            cups_count: 2,
            contract_ids: r#"["es001","ES002"]"#.into(),
            salesperson: Some("Ian".into()),
            status: None,
            status_details: Some(r#"{"OK":1,"KO CALIDAD":1}"#.into()),
            notes: Some("  ".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_with_details_reads_as_distribution() {
        let contract = DomainContract::try_from(row()).expect("valid row");
        assert_eq!(contract.contract_type, ContractType::PodoEnergia);
        assert_eq!(contract.iban.as_str(), "ES9121000418450200051332");
        assert_eq!(contract.contract_ids[0].as_str(), "ES001");
        assert_eq!(contract.status.summary_label(), "VARIOS");
        assert!(contract.notes.is_none());
    }

    #[test]
    fn row_without_status_reads_as_pending() {
        let mut db = row();
        db.status_details = None;
        let contract = DomainContract::try_from(db).expect("valid row");
        assert_eq!(contract.status, ContractStatus::Simple(Outcome::Pendiente));
    }

    #[test]
    fn simple_status_clears_details_column() {
        let update = DomainUpdateContract::status(ContractStatus::Simple(Outcome::KoDistri));
        let changeset = UpdateContract::try_from(&update).expect("encodable");
        assert_eq!(changeset.status, Some(Some("KO DISTRI".to_string())));
        assert_eq!(changeset.status_details, Some(None));
        assert!(changeset.notes.is_none());
    }

    #[test]
    fn distributed_status_clears_label_column() {
        let distribution = Distribution::from_counts([(Outcome::Ok, 2), (Outcome::Pendiente, 1)]);
        let (label, details) =
            encode_status(&ContractStatus::Distributed(distribution.clone())).expect("encodable");
        assert!(label.is_none());
        let decoded = decode_status(None, details.as_deref()).expect("decodable");
        assert_eq!(decoded, ContractStatus::Distributed(distribution));
    }
}
