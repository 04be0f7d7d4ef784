//! Contract builders shared by unit tests.

use chrono::{NaiveDate, Utc};

use crate::domain::contract::{Contract, ContractType};
use crate::domain::status::ContractStatus;
use crate::domain::types::{
    Address, ClientName, ContractId, CupsCode, CupsCount, Iban, NationalId, PhoneNumber,
    SalespersonName,
};

pub(crate) fn contract(
    id: i32,
    salesperson: Option<&str>,
    cups: u32,
    status: ContractStatus,
) -> Contract {
    contract_on(
        id,
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date"),
        salesperson,
        cups,
        status,
    )
}

pub(crate) fn contract_on(
    id: i32,
    date: NaiveDate,
    salesperson: Option<&str>,
    cups: u32,
    status: ContractStatus,
) -> Contract {
    let now = Utc::now().naive_utc();
    Contract {
        id: ContractId::new(id).expect("valid id"),
        date,
        client_name: ClientName::new("Client").expect("valid name"),
        dni: NationalId::new("12345678Z").expect("valid dni"),
        phone: PhoneNumber::new("612345678").expect("valid phone"),
        address: Address::new("Calle Mayor 1").expect("valid address"),
        iban: Iban::new("ES9121000418450200051332").expect("valid iban"),
        contract_type: ContractType::Solluz,
        cups_count: CupsCount::new(cups).expect("valid count"),
        contract_ids: (0..cups)
            .map(|i| CupsCode::new(format!("ES{i}")).expect("valid code"))
            .collect(),
        salesperson: salesperson.map(|s| SalespersonName::new(s).expect("valid name")),
        status,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}
