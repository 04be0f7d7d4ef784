//! Per-salesperson performance totals.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::contract::Contract;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SalespersonSummary {
    pub salesperson: String,
    /// CUPS signed regardless of status.
    pub total_units: u64,
    /// CUPS in `OK` or `OK RECUPERADO`.
    pub valid_units: u64,
}

/// Folds contracts into one summary per salesperson, sorted by total units
/// descending. Ties keep the order in which salespeople were first seen.
pub fn summarize<'a, I>(contracts: I) -> Vec<SalespersonSummary>
where
    I: IntoIterator<Item = &'a Contract>,
{
    let mut summaries: Vec<SalespersonSummary> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for contract in contracts {
        let name = contract.salesperson_label();
        let index = match positions.get(name) {
            Some(&index) => index,
            None => {
                summaries.push(SalespersonSummary {
                    salesperson: name.to_string(),
                    total_units: 0,
                    valid_units: 0,
                });
                positions.insert(name.to_string(), summaries.len() - 1);
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[index];
        summary.total_units += u64::from(contract.cups_count.get());
        summary.valid_units += contract.valid_units();
    }

    // `sort_by` is stable, so equal totals keep encounter order.
    summaries.sort_by(|a, b| b.total_units.cmp(&a.total_units));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::contract;
    use crate::domain::status::{ContractStatus, Distribution, Outcome};

    #[test]
    fn groups_and_sorts_by_total_units() {
        let contracts = vec![
            contract(1, Some("A"), 3, ContractStatus::Simple(Outcome::Ok)),
            contract(
                2,
                Some("A"),
                2,
                ContractStatus::Distributed(Distribution::from_counts([
                    (Outcome::Ok, 1),
                    (Outcome::Pendiente, 1),
                ])),
            ),
            contract(3, Some("B"), 4, ContractStatus::Simple(Outcome::KoDistri)),
        ];

        let summary = summarize(&contracts);
        assert_eq!(
            summary,
            vec![
                SalespersonSummary {
                    salesperson: "A".to_string(),
                    total_units: 5,
                    valid_units: 4,
                },
                SalespersonSummary {
                    salesperson: "B".to_string(),
                    total_units: 4,
                    valid_units: 0,
                },
            ]
        );
    }

    #[test]
    fn ties_keep_encounter_order_and_missing_names_are_unknown() {
        let contracts = vec![
            contract(1, Some("Zoe"), 2, ContractStatus::Simple(Outcome::OkRecuperado)),
            contract(2, None, 2, ContractStatus::Simple(Outcome::Ok)),
            contract(3, Some("Ana"), 2, ContractStatus::Simple(Outcome::Pendiente)),
        ];

        let names: Vec<_> = summarize(&contracts)
            .into_iter()
            .map(|s| (s.salesperson, s.valid_units))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Zoe".to_string(), 2),
                ("Unknown".to_string(), 2),
                ("Ana".to_string(), 0)
            ]
        );
        assert_eq!(summarize(&contracts), summarize(&contracts));
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        assert!(summarize(&[]).is_empty());
    }
}
