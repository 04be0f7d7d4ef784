//! DTOs exposed by the JSON API.

use serde::Serialize;

use crate::domain::summary::SalespersonSummary;
use crate::dto::main::ContractRow;

#[derive(Debug, Serialize)]
pub struct ContractsResponse {
    pub range: String,
    pub total: usize,
    pub contracts: Vec<ContractRow>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub range: String,
    pub total_units: u64,
    pub valid_units: u64,
    pub salespeople: Vec<SalespersonSummary>,
}
