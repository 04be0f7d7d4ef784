//! Contract outcome model: simple statuses, CUPS distributions and the
//! reconciliation that converts between them.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::CupsCount;

/// Display label used for records split across several outcomes.
pub const SPLIT_LABEL: &str = "VARIOS";

/// Outcome of a single supply point.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Outcome {
    Ok,
    OkRecuperado,
    Pendiente,
    KoDistri,
    KoCalidad,
    IlocCalidad,
    BajaComer,
    Other(String),
}

impl Outcome {
    /// Outcomes offered by the status selector, in display order.
    pub const KNOWN: [Outcome; 7] = [
        Outcome::Ok,
        Outcome::OkRecuperado,
        Outcome::Pendiente,
        Outcome::KoDistri,
        Outcome::KoCalidad,
        Outcome::IlocCalidad,
        Outcome::BajaComer,
    ];

    /// Whether units with this outcome count as valid sales.
    pub fn is_valid_sale(&self) -> bool {
        matches!(self, Outcome::Ok | Outcome::OkRecuperado)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ok => write!(f, "OK"),
            Outcome::OkRecuperado => write!(f, "OK RECUPERADO"),
            Outcome::Pendiente => write!(f, "PENDIENTE"),
            Outcome::KoDistri => write!(f, "KO DISTRI"),
            Outcome::KoCalidad => write!(f, "KO CALIDAD"),
            Outcome::IlocCalidad => write!(f, "ILOC CALIDAD"),
            Outcome::BajaComer => write!(f, "BAJA COMER"),
            Outcome::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        match s.trim() {
            "OK" => Outcome::Ok,
            "OK RECUPERADO" => Outcome::OkRecuperado,
            "PENDIENTE" => Outcome::Pendiente,
            "KO DISTRI" => Outcome::KoDistri,
            "KO CALIDAD" => Outcome::KoCalidad,
            "ILOC CALIDAD" => Outcome::IlocCalidad,
            "BAJA COMER" => Outcome::BajaComer,
            other => Outcome::Other(other.to_string()),
        }
    }
}

impl From<String> for Outcome {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.to_string()
    }
}

/// Mapping of outcome to the number of CUPS in that outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<Outcome, u32>);

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a distribution from already typed counts. Repeated outcomes are
    /// summed.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Outcome, u32)>,
    {
        let mut buckets = BTreeMap::new();
        for (outcome, count) in counts {
            let bucket: &mut u32 = buckets.entry(outcome).or_default();
            *bucket = bucket.saturating_add(count);
        }
        Self(buckets)
    }

    /// Builds a distribution from raw user input.
    ///
    /// Counts that are blank, unparseable or negative are coerced to zero.
    /// Blank labels are ignored.
    pub fn from_raw<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let counts = pairs
            .into_iter()
            .filter(|(label, _)| !label.as_ref().trim().is_empty())
            .map(|(label, value)| (Outcome::from(label.as_ref()), coerce_count(value.as_ref())));
        Self::from_counts(counts)
    }

    pub fn get(&self, outcome: &Outcome) -> u32 {
        self.0.get(outcome).copied().unwrap_or(0)
    }

    pub fn set(&mut self, outcome: Outcome, count: u32) {
        self.0.insert(outcome, count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Outcome, &u32)> {
        self.0.iter()
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.0.values().map(|&v| u64::from(v)).sum()
    }

    /// Buckets holding at least one unit.
    pub fn non_zero(&self) -> impl Iterator<Item = (&Outcome, u32)> {
        self.0.iter().filter(|(_, v)| **v > 0).map(|(k, v)| (k, *v))
    }

    /// Units counted as valid sales (`OK` and `OK RECUPERADO`).
    pub fn valid_units(&self) -> u64 {
        self.non_zero()
            .filter(|(outcome, _)| outcome.is_valid_sale())
            .map(|(_, count)| u64::from(count))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.non_zero().next().is_none()
    }

    /// Copy of this distribution without zero buckets.
    pub fn without_zeroes(&self) -> Self {
        Self::from_counts(self.non_zero().map(|(k, v)| (k.clone(), v)))
    }
}

fn coerce_count(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => 0,
    }
}

/// Error returned when a distribution cannot be saved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error("{excess} CUPS too many")]
    OverAllocated { excess: u64 },
}

/// Outcome of checking a distribution against a contract's CUPS count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub total_units: CupsCount,
    /// Input distribution with zero buckets removed.
    pub normalized: Distribution,
    /// `total_units - sum`; negative on over-allocation.
    pub remaining: i64,
    pub valid: bool,
}

/// Checks `distribution` against `total_units`.
pub fn reconcile(total_units: CupsCount, distribution: &Distribution) -> Reconciliation {
    let normalized = distribution.without_zeroes();
    let sum = i64::try_from(normalized.total()).unwrap_or(i64::MAX);
    let remaining = i64::from(total_units.get()) - sum;
    Reconciliation {
        total_units,
        normalized,
        remaining,
        valid: remaining >= 0,
    }
}

impl Reconciliation {
    /// Units that have not been assigned to any outcome yet.
    pub fn undetermined(&self) -> u64 {
        u64::try_from(self.remaining).unwrap_or(0)
    }

    /// Short human readable state of the distribution.
    pub fn describe(&self) -> String {
        match self.remaining {
            r if r > 0 => format!("{r} undetermined"),
            r if r < 0 => format!("{} too many!", r.unsigned_abs()),
            _ => "All perfectly distributed".to_string(),
        }
    }

    /// Converts a valid reconciliation into the status to persist.
    ///
    /// One non-zero bucket covering every unit collapses to a simple status.
    /// A distribution with no units assigned at all is pending.
    pub fn into_status(self) -> Result<ContractStatus, DistributionError> {
        if !self.valid {
            return Err(DistributionError::OverAllocated {
                excess: self.remaining.unsigned_abs(),
            });
        }

        let collapsed = {
            let mut buckets = self.normalized.non_zero();
            match (buckets.next(), buckets.next()) {
                (None, _) => Some(Outcome::Pendiente),
                (Some((outcome, count)), None) if count == self.total_units.get() => {
                    Some(outcome.clone())
                }
                _ => None,
            }
        };

        Ok(match collapsed {
            Some(outcome) => ContractStatus::Simple(outcome),
            None => ContractStatus::Distributed(self.normalized),
        })
    }
}

/// Status of a contract: a single outcome for every CUPS, or a distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContractStatus {
    Simple(Outcome),
    Distributed(Distribution),
}

impl Default for ContractStatus {
    fn default() -> Self {
        ContractStatus::Simple(Outcome::Pendiente)
    }
}

impl ContractStatus {
    /// Label shown in lists and exports.
    pub fn summary_label(&self) -> String {
        match self {
            ContractStatus::Simple(outcome) => outcome.to_string(),
            ContractStatus::Distributed(distribution) => {
                let mut buckets = distribution.non_zero();
                match (buckets.next(), buckets.next()) {
                    (Some((outcome, _)), None) => outcome.to_string(),
                    _ => SPLIT_LABEL.to_string(),
                }
            }
        }
    }

    pub fn details(&self) -> Option<&Distribution> {
        match self {
            ContractStatus::Simple(_) => None,
            ContractStatus::Distributed(distribution) => Some(distribution),
        }
    }

    /// Units counted as valid sales for a contract with `total` CUPS.
    pub fn valid_units(&self, total: CupsCount) -> u64 {
        match self {
            ContractStatus::Simple(outcome) if outcome.is_valid_sale() => u64::from(total.get()),
            ContractStatus::Simple(_) => 0,
            ContractStatus::Distributed(distribution) => distribution.valid_units(),
        }
    }

    /// Units not yet assigned to any outcome.
    pub fn undetermined(&self, total: CupsCount) -> u64 {
        match self {
            ContractStatus::Simple(_) => 0,
            ContractStatus::Distributed(distribution) => {
                u64::from(total.get()).saturating_sub(distribution.total())
            }
        }
    }

    /// Starting point for editing the distribution of this status.
    pub fn to_details(&self, total: CupsCount) -> Distribution {
        match self {
            ContractStatus::Simple(outcome) => {
                Distribution::from_counts([(outcome.clone(), total.get())])
            }
            ContractStatus::Distributed(distribution) => distribution.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(value: u32) -> CupsCount {
        CupsCount::new(value).expect("valid count")
    }

    #[test]
    fn remaining_is_total_minus_sum() {
        let distribution =
            Distribution::from_counts([(Outcome::Ok, 2), (Outcome::Pendiente, 1)]);
        let result = reconcile(units(5), &distribution);
        assert_eq!(result.remaining, 2);
        assert!(result.valid);
        assert_eq!(result.undetermined(), 2);
        assert_eq!(result.describe(), "2 undetermined");

        let over = Distribution::from_counts([(Outcome::Ok, 4), (Outcome::KoDistri, 3)]);
        let result = reconcile(units(5), &over);
        assert_eq!(result.remaining, -2);
        assert!(!result.valid);
        assert_eq!(result.describe(), "2 too many!");
        assert_eq!(
            result.into_status(),
            Err(DistributionError::OverAllocated { excess: 2 })
        );
    }

    #[test]
    fn single_full_bucket_collapses_to_simple_status() {
        let distribution = Distribution::from_counts([(Outcome::Ok, 5)]);
        let status = reconcile(units(5), &distribution)
            .into_status()
            .expect("valid distribution");
        assert_eq!(status, ContractStatus::Simple(Outcome::Ok));
    }

    #[test]
    fn split_buckets_stay_distributed() {
        let distribution = Distribution::from_counts([(Outcome::Ok, 3), (Outcome::KoDistri, 2)]);
        let status = reconcile(units(5), &distribution)
            .into_status()
            .expect("valid distribution");
        assert_eq!(status.summary_label(), SPLIT_LABEL);
        assert_eq!(status.details(), Some(&distribution));
    }

    #[test]
    fn partial_single_bucket_is_not_collapsed() {
        let distribution = Distribution::from_counts([(Outcome::Ok, 3), (Outcome::KoCalidad, 0)]);
        let status = reconcile(units(5), &distribution)
            .into_status()
            .expect("valid distribution");
        assert_eq!(
            status,
            ContractStatus::Distributed(Distribution::from_counts([(Outcome::Ok, 3)]))
        );
        assert_eq!(status.summary_label(), "OK");
        assert_eq!(status.undetermined(units(5)), 2);
    }

    #[test]
    fn empty_distribution_is_pending() {
        let status = reconcile(units(2), &Distribution::new())
            .into_status()
            .expect("valid distribution");
        assert_eq!(status, ContractStatus::Simple(Outcome::Pendiente));
    }

    #[test]
    fn raw_values_are_coerced() {
        let distribution = Distribution::from_raw([
            ("OK", "2"),
            ("KO DISTRI", "abc"),
            ("PENDIENTE", "-3"),
            ("BAJA COMER", ""),
            ("", "7"),
        ]);
        assert_eq!(distribution.get(&Outcome::Ok), 2);
        assert_eq!(distribution.get(&Outcome::KoDistri), 0);
        assert_eq!(distribution.get(&Outcome::Pendiente), 0);
        assert_eq!(distribution.total(), 2);
    }

    #[test]
    fn repeated_labels_add_up_and_cannot_hide_excess() {
        let distribution = Distribution::from_raw([("OK", "3"), ("OK", "3")]);
        assert_eq!(distribution.get(&Outcome::Ok), 6);
        assert_eq!(
            reconcile(units(5), &distribution).into_status(),
            Err(DistributionError::OverAllocated { excess: 1 })
        );
    }

    #[test]
    fn reconcile_is_idempotent() {
        let distribution = Distribution::from_raw([("OK", "1"), ("KO CALIDAD", "1")]);
        let first = reconcile(units(3), &distribution);
        let second = reconcile(units(3), &distribution);
        assert_eq!(first, second);
    }

    #[test]
    fn valid_units_count_ok_buckets_only() {
        let distribution = Distribution::from_counts([
            (Outcome::Ok, 1),
            (Outcome::OkRecuperado, 2),
            (Outcome::Other("OK PARCIAL".to_string()), 1),
        ]);
        let status = ContractStatus::Distributed(distribution);
        assert_eq!(status.valid_units(units(5)), 3);

        assert_eq!(ContractStatus::Simple(Outcome::OkRecuperado).valid_units(units(4)), 4);
        assert_eq!(ContractStatus::Simple(Outcome::KoDistri).valid_units(units(4)), 0);
    }

    #[test]
    fn unknown_labels_round_trip() {
        let outcome = Outcome::from("EN REVISION");
        assert_eq!(outcome, Outcome::Other("EN REVISION".to_string()));
        assert_eq!(outcome.to_string(), "EN REVISION");
        assert_eq!(Outcome::from("OK RECUPERADO"), Outcome::OkRecuperado);
    }

    #[test]
    fn distribution_serializes_as_label_map() {
        let distribution = Distribution::from_counts([(Outcome::Ok, 1), (Outcome::KoDistri, 1)]);
        let json = serde_json::to_string(&distribution).expect("serializable");
        assert_eq!(json, r#"{"OK":1,"KO DISTRI":1}"#);
        let back: Distribution = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, distribution);
    }

    #[test]
    fn simple_status_details_cover_all_units() {
        let details = ContractStatus::Simple(Outcome::Pendiente).to_details(units(3));
        assert_eq!(details.get(&Outcome::Pendiente), 3);
    }
}
