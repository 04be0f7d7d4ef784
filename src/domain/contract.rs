//! Contract aggregate and its create/update payloads.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::status::{ContractStatus, Outcome};
use crate::domain::types::{
    Address, ClientName, ContractId, ContractNotes, CupsCode, CupsCount, Iban, NationalId,
    PhoneNumber, SalespersonName, TypeConstraintError,
};

/// Name used for contracts without a salesperson.
pub const UNKNOWN_SALESPERSON: &str = "Unknown";

/// Product category of a contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[default]
    #[serde(rename = "Solluz")]
    Solluz,
    #[serde(rename = "Podo Energia")]
    PodoEnergia,
}

impl ContractType {
    pub const ALL: [ContractType; 2] = [ContractType::Solluz, ContractType::PodoEnergia];
}

impl Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractType::Solluz => write!(f, "Solluz"),
            ContractType::PodoEnergia => write!(f, "Podo Energia"),
        }
    }
}

impl FromStr for ContractType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Solluz" => Ok(ContractType::Solluz),
            "Podo Energia" => Ok(ContractType::PodoEnergia),
            other => Err(TypeConstraintError::UnknownContractType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    pub id: ContractId,
    pub date: NaiveDate,
    pub client_name: ClientName,
    pub dni: NationalId,
    pub phone: PhoneNumber,
    pub address: Address,
    pub iban: Iban,
    pub contract_type: ContractType,
    pub cups_count: CupsCount,
    pub contract_ids: Vec<CupsCode>,
    /// Owning agent; legacy rows may lack one.
    pub salesperson: Option<SalespersonName>,
    pub status: ContractStatus,
    pub notes: Option<ContractNotes>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Contract {
    /// Salesperson name used for grouping.
    pub fn salesperson_label(&self) -> &str {
        self.salesperson
            .as_ref()
            .map(SalespersonName::as_str)
            .unwrap_or(UNKNOWN_SALESPERSON)
    }

    /// CUPS of this contract counted as valid sales.
    pub fn valid_units(&self) -> u64 {
        self.status.valid_units(self.cups_count)
    }
}

/// Validates the CUPS codes typed for a contract: one non-blank code per unit.
pub fn cups_codes<S: AsRef<str>>(
    cups_count: CupsCount,
    raw_codes: &[S],
) -> Result<Vec<CupsCode>, TypeConstraintError> {
    if raw_codes.len() != cups_count.get() as usize {
        return Err(TypeConstraintError::CupsCodesMismatch {
            expected: cups_count.get(),
            actual: raw_codes.len(),
        });
    }
    raw_codes
        .iter()
        .map(|code| CupsCode::new(code.as_ref()))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewContract {
    pub date: NaiveDate,
    pub client_name: ClientName,
    pub dni: NationalId,
    pub phone: PhoneNumber,
    pub address: Address,
    pub iban: Iban,
    pub contract_type: ContractType,
    pub cups_count: CupsCount,
    pub contract_ids: Vec<CupsCode>,
    pub salesperson: SalespersonName,
    pub status: ContractStatus,
    pub notes: Option<ContractNotes>,
}

impl NewContract {
    /// Status assigned to freshly signed contracts: every CUPS is `OK`.
    pub fn initial_status() -> ContractStatus {
        ContractStatus::Simple(Outcome::Ok)
    }
}

/// Partial update of a contract. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateContract {
    pub status: Option<ContractStatus>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<ContractNotes>>,
}

impl UpdateContract {
    #[must_use]
    pub fn status(status: ContractStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn notes(notes: Option<ContractNotes>) -> Self {
        Self {
            notes: Some(notes),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: u32) -> CupsCount {
        CupsCount::new(value).expect("valid count")
    }

    #[test]
    fn codes_must_match_count() {
        let codes = cups_codes(count(2), &["es001", "ES002"]).expect("valid codes");
        assert_eq!(codes[0].as_str(), "ES001");

        assert_eq!(
            cups_codes(count(3), &["ES001", "ES002"]),
            Err(TypeConstraintError::CupsCodesMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn blank_code_slot_is_rejected() {
        assert_eq!(
            cups_codes(count(2), &["ES001", "  "]),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn contract_type_labels() {
        assert_eq!(
            "Podo Energia".parse::<ContractType>(),
            Ok(ContractType::PodoEnergia)
        );
        assert_eq!(ContractType::Solluz.to_string(), "Solluz");
        assert!("Gas".parse::<ContractType>().is_err());
    }

    #[test]
    fn update_builders_touch_one_field() {
        let update = UpdateContract::status(NewContract::initial_status());
        assert!(update.notes.is_none());
        assert!(!update.is_empty());
        assert!(UpdateContract::default().is_empty());
    }
}
