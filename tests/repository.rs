use chrono::NaiveDate;
use contract_tracker::domain::contract::{ContractType, NewContract, UpdateContract, cups_codes};
use contract_tracker::domain::credential::{Credential, CredentialKey};
use contract_tracker::domain::status::{ContractStatus, Distribution, Outcome};
use contract_tracker::domain::team::{NewTeamMembership, Team};
use contract_tracker::domain::types::{
    Address, ClientName, ContractNotes, CupsCount, Iban, NationalId, NonEmptyString, PhoneNumber,
    SalespersonName,
};
use contract_tracker::repository::errors::RepositoryError;
use contract_tracker::repository::{
    ContractReader, ContractWriter, CredentialReader, CredentialWriter, DieselRepository,
    TeamReader, TeamWriter,
};

mod common;

fn new_contract(day: u32, client: &str, salesperson: &str, cups: u32) -> NewContract {
    let cups_count = CupsCount::new(cups).unwrap();
    let codes: Vec<String> = (0..cups).map(|i| format!("ES{day:02}{i:04}")).collect();
    NewContract {
        date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        client_name: ClientName::new(client).unwrap(),
        dni: NationalId::new("12345678Z").unwrap(),
        phone: PhoneNumber::new("612 345 678").unwrap(),
        address: Address::new("Calle Mayor 1").unwrap(),
        iban: Iban::new("ES9121000418450200051332").unwrap(),
        contract_type: ContractType::Solluz,
        cups_count,
        contract_ids: cups_codes(cups_count, &codes).unwrap(),
        salesperson: SalespersonName::new(salesperson).unwrap(),
        status: NewContract::initial_status(),
        notes: None,
    }
}

#[test]
fn test_contract_repository_crud() {
    let test_db = common::TestDb::new("test_contract_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let early = repo.create_contract(&new_contract(1, "Alice", "Ian", 1)).unwrap();
    let late = repo.create_contract(&new_contract(20, "Bob", "Pepe", 3)).unwrap();
    assert_eq!(late.contract_ids.len(), 3);
    assert_eq!(late.status, ContractStatus::Simple(Outcome::Ok));
    assert_eq!(late.phone.as_str(), "+34612345678");

    let listed = repo.list_contracts().unwrap();
    let names: Vec<_> = listed.iter().map(|c| c.client_name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);

    let notes = ContractNotes::optional("call back on monday");
    let updated = repo
        .update_contract(early.id, &UpdateContract::notes(notes.clone()))
        .unwrap();
    assert_eq!(updated.notes, notes);
    assert_eq!(updated.status, early.status);

    repo.delete_contract(early.id).unwrap();
    assert!(repo.get_contract_by_id(early.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_contract(early.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_status_round_trips_both_forms() {
    let test_db = common::TestDb::new("test_status_round_trips_both_forms.db");
    let repo = DieselRepository::new(test_db.pool());
    let contract = repo.create_contract(&new_contract(5, "Carla", "Ian", 3)).unwrap();

    let split = ContractStatus::Distributed(Distribution::from_counts([
        (Outcome::Ok, 2),
        (Outcome::KoDistri, 1),
    ]));
    let stored = repo
        .update_contract(contract.id, &UpdateContract::status(split.clone()))
        .unwrap();
    assert_eq!(stored.status, split);
    assert_eq!(stored.valid_units(), 2);

    let simple = ContractStatus::Simple(Outcome::BajaComer);
    let stored = repo
        .update_contract(contract.id, &UpdateContract::status(simple.clone()))
        .unwrap();
    assert_eq!(stored.status, simple);
    assert_eq!(
        repo.get_contract_by_id(contract.id).unwrap().unwrap().status,
        simple
    );
}

#[test]
fn test_team_repository_unique_names() {
    let test_db = common::TestDb::new("test_team_repository_unique_names.db");
    let repo = DieselRepository::new(test_db.pool());
    let member = |name: &str, team| NewTeamMembership::new(SalespersonName::new(name).unwrap(), team);

    let ian = repo.add_team_member(&member("Ian", Team::Amoraga)).unwrap();
    repo.add_team_member(&member("Pepe", Team::David)).unwrap();
    assert!(matches!(
        repo.add_team_member(&member("Ian", Team::Sandra)),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let members = repo.list_team_members().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].team, Team::Amoraga);

    repo.remove_team_member(ian.id).unwrap();
    assert_eq!(repo.list_team_members().unwrap().len(), 1);
    assert!(matches!(
        repo.remove_team_member(ian.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_credential_upsert_replaces_values() {
    let test_db = common::TestDb::new("test_credential_upsert_replaces_values.db");
    let repo = DieselRepository::new(test_db.pool());
    let credential = |key, value: &str| Credential::new(key, NonEmptyString::new(value).unwrap());

    assert!(repo
        .get_credential(CredentialKey::ManagerPassword)
        .unwrap()
        .is_none());

    repo.upsert_credentials(&[
        credential(CredentialKey::ManagerPassword, "first-pass"),
        credential(CredentialKey::CommercialPassword, "agents-1"),
    ])
    .unwrap();
    repo.upsert_credentials(&[credential(CredentialKey::ManagerPassword, "second-pass")])
        .unwrap();

    let manager = repo
        .get_credential(CredentialKey::ManagerPassword)
        .unwrap()
        .unwrap();
    assert!(manager.matches("second-pass"));
    let commercial = repo
        .get_credential(CredentialKey::CommercialPassword)
        .unwrap()
        .unwrap();
    assert!(commercial.matches("agents-1"));
}
