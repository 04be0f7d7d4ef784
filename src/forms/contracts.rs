//! Forms for recording contracts and editing their status and notes.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::contract::{ContractType, NewContract, cups_codes};
use crate::domain::status::{Distribution, Outcome};
use crate::domain::types::{
    Address, ClientName, ContractNotes, CupsCode, CupsCount, Iban, NationalId, PhoneNumber,
    SalespersonName,
};
use crate::forms::FormError;

/// Upper bound on supply points per contract accepted from the form.
pub const MAX_CUPS_PER_CONTRACT: u32 = 50;

#[derive(Debug, Deserialize, Validate)]
/// New contract as submitted. `cups` repeats once per supply point.
pub struct AddContractForm {
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub client_name: String,
    #[validate(length(min = 1))]
    pub dni: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub iban: String,
    pub contract_type: String,
    #[validate(range(min = 1, max = 50))]
    pub cups_count: u32,
    #[serde(default)]
    pub cups: Vec<String>,
    #[serde(default)]
    pub salesperson: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated contract data still waiting for its owning salesperson.
#[derive(Debug, Clone)]
pub struct AddContractPayload {
    pub date: NaiveDate,
    pub client_name: ClientName,
    pub dni: NationalId,
    pub phone: PhoneNumber,
    pub address: Address,
    pub iban: Iban,
    pub contract_type: ContractType,
    pub cups_count: CupsCount,
    pub contract_ids: Vec<CupsCode>,
    /// Salesperson picked in the form, if any.
    pub salesperson: Option<SalespersonName>,
    pub notes: Option<ContractNotes>,
}

impl TryFrom<AddContractForm> for AddContractPayload {
    type Error = FormError;

    fn try_from(form: AddContractForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let cups_count = CupsCount::new(form.cups_count).map_err(|_| FormError::InvalidCupsCodes)?;
        let contract_ids =
            cups_codes(cups_count, &form.cups).map_err(|_| FormError::InvalidCupsCodes)?;

        Ok(Self {
            date: form.date,
            client_name: ClientName::new(form.client_name).map_err(|_| FormError::InvalidName)?,
            dni: NationalId::new(form.dni).map_err(|_| FormError::InvalidName)?,
            phone: PhoneNumber::new(form.phone).map_err(|_| FormError::InvalidPhoneNumber)?,
            address: Address::new(form.address).map_err(|_| FormError::InvalidName)?,
            iban: Iban::new(form.iban).map_err(|_| FormError::InvalidName)?,
            contract_type: form
                .contract_type
                .parse()
                .map_err(|_| FormError::InvalidContractType)?,
            cups_count,
            contract_ids,
            salesperson: form
                .salesperson
                .and_then(|name| SalespersonName::new(name).ok()),
            notes: form.notes.and_then(ContractNotes::optional),
        })
    }
}

impl AddContractPayload {
    /// Builds the stored contract for `salesperson` with every CUPS `OK`.
    pub fn into_domain(self, salesperson: SalespersonName) -> NewContract {
        NewContract {
            date: self.date,
            client_name: self.client_name,
            dni: self.dni,
            phone: self.phone,
            address: self.address,
            iban: self.iban,
            contract_type: self.contract_type,
            cups_count: self.cups_count,
            contract_ids: self.contract_ids,
            salesperson,
            status: NewContract::initial_status(),
            notes: self.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// Status change: either a single `status` or repeated `label`/`count`
/// pairs from the splitter.
pub struct UpdateStatusForm {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub label: Vec<String>,
    #[serde(default)]
    pub count: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Simple(Outcome),
    Split(Distribution),
}

impl TryFrom<UpdateStatusForm> for StatusChange {
    type Error = FormError;

    fn try_from(form: UpdateStatusForm) -> Result<Self, Self::Error> {
        if !form.label.is_empty() {
            let pairs = form.label.iter().zip(
                form.count
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::repeat("")),
            );
            return Ok(StatusChange::Split(Distribution::from_raw(pairs)));
        }

        match form.status.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => Ok(StatusChange::Simple(Outcome::from(label))),
            _ => Err(FormError::MissingStatus),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNotesForm {
    #[serde(default)]
    pub notes: String,
}

impl UpdateNotesForm {
    /// Sanitized notes; blank input clears them.
    pub fn notes(&self) -> Option<ContractNotes> {
        ContractNotes::optional(self.notes.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteContractForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteContractForm {
    pub fn ensure_confirmed(&self) -> Result<(), FormError> {
        match self.confirm.as_deref() {
            Some("true") => Ok(()),
            _ => Err(FormError::NotConfirmed),
        }
    }
}
