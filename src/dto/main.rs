use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::contract::{Contract, ContractType};
use crate::domain::period::{MonthBucket, TimeFilter, WeekBucket};
use crate::domain::status::{ContractStatus, Outcome, SPLIT_LABEL};
use crate::domain::summary::SalespersonSummary;

/// Query string accepted by the index page and the export.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Wire-encoded [`TimeFilter`].
    pub range: Option<String>,
}

/// One bucket in the splitter: outcome label and its current count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSlot {
    pub label: String,
    pub count: u32,
}

/// A contract as rendered in the list.
#[derive(Debug, Clone, Serialize)]
pub struct ContractRow {
    pub id: i32,
    pub date: NaiveDate,
    pub client_name: String,
    pub contract_type: String,
    pub cups_count: u32,
    pub contract_ids: Vec<String>,
    pub salesperson: String,
    pub status_label: String,
    /// Outcome preselected in the simple status picker. `None` for splits and
    /// unrecognised labels, which the picker shows as a placeholder.
    pub simple_outcome: Option<String>,
    pub is_split: bool,
    pub splitter: Vec<SplitSlot>,
    pub undetermined: u64,
    pub valid_units: u64,
    pub notes: Option<String>,
    /// Client identity and bank details, present for managers only.
    pub client_details: Option<ClientDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDetails {
    pub dni: String,
    pub phone: String,
    pub address: String,
    pub iban: String,
}

impl ContractRow {
    pub fn new(contract: &Contract, with_client_details: bool) -> Self {
        let details = contract.status.to_details(contract.cups_count);
        let mut splitter: Vec<SplitSlot> = Outcome::KNOWN
            .iter()
            .map(|outcome| SplitSlot {
                label: outcome.to_string(),
                count: details.get(outcome),
            })
            .collect();
        splitter.extend(
            details
                .iter()
                .filter(|(outcome, _)| matches!(outcome, Outcome::Other(_)))
                .map(|(outcome, count)| SplitSlot {
                    label: outcome.to_string(),
                    count: *count,
                }),
        );

        let status_label = contract.status.summary_label();
        let simple_outcome = match &contract.status {
            ContractStatus::Simple(outcome) if Outcome::KNOWN.contains(outcome) => {
                Some(outcome.to_string())
            }
            _ => None,
        };
        Self {
            id: contract.id.get(),
            date: contract.date,
            client_name: contract.client_name.to_string(),
            contract_type: contract.contract_type.to_string(),
            cups_count: contract.cups_count.get(),
            contract_ids: contract
                .contract_ids
                .iter()
                .map(|code| code.to_string())
                .collect(),
            salesperson: contract.salesperson_label().to_string(),
            simple_outcome,
            is_split: status_label == SPLIT_LABEL,
            status_label,
            splitter,
            undetermined: contract.status.undetermined(contract.cups_count),
            valid_units: contract.valid_units(),
            notes: contract.notes.as_ref().map(|notes| notes.to_string()),
            client_details: with_client_details.then(|| ClientDetails {
                dni: contract.dni.to_string(),
                phone: contract.phone.to_string(),
                address: contract.address.to_string(),
                iban: contract.iban.to_string(),
            }),
        }
    }
}

/// A month or week link in the date strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodLink {
    pub label: String,
    /// Value of the `range` query parameter selecting this period.
    pub range: String,
    pub selected: bool,
}

impl PeriodLink {
    /// A month stays highlighted while one of its weeks is selected.
    pub fn month(bucket: &MonthBucket, filter: &TimeFilter) -> Self {
        Self {
            label: bucket.label.clone(),
            range: TimeFilter::select(bucket).to_string(),
            selected: filter.active_month() == Some((bucket.year, bucket.month_index)),
        }
    }

    pub fn week(bucket: &WeekBucket, filter: &TimeFilter) -> Self {
        Self {
            label: bucket.label.clone(),
            range: TimeFilter::select(bucket).to_string(),
            selected: filter.is_selected(bucket),
        }
    }
}

/// Data required to render the main dashboard.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    /// Wire form of the active filter, echoed into every form.
    pub range: String,
    pub contracts: Vec<ContractRow>,
    pub summary: Vec<SalespersonSummary>,
    pub months: Vec<PeriodLink>,
    pub weeks: Vec<PeriodLink>,
    /// Salespeople the user may record a contract for.
    pub salespeople: Vec<String>,
    pub outcomes: Vec<String>,
    pub contract_types: Vec<String>,
    pub can_delete: bool,
    pub show_client_details: bool,
    pub max_cups: u32,
}

pub fn contract_type_labels() -> Vec<String> {
    ContractType::ALL.iter().map(ToString::to_string).collect()
}

pub fn outcome_labels() -> Vec<String> {
    Outcome::KNOWN.iter().map(ToString::to_string).collect()
}
