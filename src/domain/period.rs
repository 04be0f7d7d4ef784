//! Calendar buckets used to filter contracts by month and week.
//!
//! All dates are civil dates (`NaiveDate`): encoded ranges are parsed as plain
//! `YYYY-MM-DD` strings and never pass through a timezone.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::domain::contract::Contract;
use crate::domain::types::TypeConstraintError;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Wire value of the "no filtering" selection.
pub const ALL_FILTER: &str = "all";

const DATE_FORMAT: &str = "%Y-%m-%d";
const RANGE_SEPARATOR: char = '_';
const WEEK_LENGTH: u32 = 7;

/// Inclusive range of civil dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TypeConstraintError> {
        if start > end {
            return Err(TypeConstraintError::InvalidValue(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive at both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{RANGE_SEPARATOR}{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl FromStr for DateRange {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeConstraintError::InvalidValue(format!("invalid date range: {s}"));
        let (start, end) = s.trim().split_once(RANGE_SEPARATOR).ok_or_else(invalid)?;
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|_| invalid())?;
        let end = NaiveDate::parse_from_str(end, DATE_FORMAT).map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

/// Anything that covers a range of dates.
pub trait DateBucket {
    fn range(&self) -> DateRange;
}

/// One calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Display label, e.g. `Feb 2028`.
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub year: i32,
    /// Zero based month index.
    pub month_index: u32,
}

impl DateBucket for MonthBucket {
    fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// A window of up to seven days inside a month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    /// Display label, e.g. `29-31`.
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateBucket for WeekBucket {
    fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

fn first_of_month(year: i32, month_index: u32) -> Option<NaiveDate> {
    if month_index >= 12 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month_index + 1, 1)
}

fn last_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}

/// Number of days in the month, leap years included.
pub fn days_in_month(year: i32, month_index: u32) -> Option<u32> {
    let first = first_of_month(year, month_index)?;
    last_of_month(first).map(|last| last.day())
}

/// One bucket per calendar month of every year, in ascending order.
pub fn month_buckets(years: &BTreeSet<i32>) -> Vec<MonthBucket> {
    years
        .iter()
        .flat_map(|&year| (0..12u32).map(move |month_index| (year, month_index)))
        .filter_map(|(year, month_index)| {
            let start = first_of_month(year, month_index)?;
            let end = last_of_month(start)?;
            Some(MonthBucket {
                label: format!("{} {year}", MONTH_NAMES[month_index as usize]),
                start,
                end,
                year,
                month_index,
            })
        })
        .collect()
}

/// Splits a month into consecutive 7-day windows starting on day 1; the last
/// window ends on the month's last day.
pub fn week_buckets(year: i32, month_index: u32) -> Result<Vec<WeekBucket>, TypeConstraintError> {
    let invalid =
        || TypeConstraintError::InvalidValue(format!("invalid month {month_index} of {year}"));
    let first = first_of_month(year, month_index).ok_or_else(invalid)?;
    let days = last_of_month(first).ok_or_else(invalid)?.day();

    let mut weeks = Vec::with_capacity(days.div_ceil(WEEK_LENGTH) as usize);
    let mut start_day = 1;
    while start_day <= days {
        let end_day = (start_day + WEEK_LENGTH - 1).min(days);
        let start = first.with_day(start_day).ok_or_else(invalid)?;
        let end = first.with_day(end_day).ok_or_else(invalid)?;
        weeks.push(WeekBucket {
            label: format!("{start_day}-{end_day}"),
            start,
            end,
        });
        start_day += WEEK_LENGTH;
    }
    Ok(weeks)
}

/// Inclusive test of `date` against the bucket's range.
pub fn matches<B: DateBucket + ?Sized>(date: NaiveDate, bucket: &B) -> bool {
    bucket.range().contains(date)
}

/// Current date filter selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TimeFilter {
    #[default]
    All,
    Range(DateRange),
}

impl TimeFilter {
    /// Selection produced by clicking a month or a week.
    pub fn select<B: DateBucket + ?Sized>(bucket: &B) -> Self {
        TimeFilter::Range(bucket.range())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            TimeFilter::All => true,
            TimeFilter::Range(range) => range.contains(date),
        }
    }

    /// Year and zero based month of the selection start, used to show the
    /// week strip of the active month.
    pub fn active_month(&self) -> Option<(i32, u32)> {
        match self {
            TimeFilter::All => None,
            TimeFilter::Range(range) => Some((range.start.year(), range.start.month0())),
        }
    }

    /// Whether the selection is exactly this bucket.
    pub fn is_selected<B: DateBucket + ?Sized>(&self, bucket: &B) -> bool {
        matches!(self, TimeFilter::Range(range) if *range == bucket.range())
    }

    /// Keeps the contracts dated inside the selection.
    pub fn apply(&self, contracts: Vec<Contract>) -> Vec<Contract> {
        match self {
            TimeFilter::All => contracts,
            TimeFilter::Range(range) => contracts
                .into_iter()
                .filter(|contract| range.contains(contract.date))
                .collect(),
        }
    }
}

impl Display for TimeFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFilter::All => write!(f, "{ALL_FILTER}"),
            TimeFilter::Range(range) => write!(f, "{range}"),
        }
    }
}

impl FromStr for TimeFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == ALL_FILTER {
            return Ok(TimeFilter::All);
        }
        Ok(TimeFilter::Range(trimmed.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn february_respects_leap_years() {
        let buckets = month_buckets(&BTreeSet::from([2025, 2028]));
        assert_eq!(buckets.len(), 24);

        let feb_2025 = &buckets[1];
        assert_eq!(feb_2025.label, "Feb 2025");
        assert_eq!(feb_2025.end, date(2025, 2, 28));

        let feb_2028 = &buckets[13];
        assert_eq!(feb_2028.label, "Feb 2028");
        assert_eq!(feb_2028.month_index, 1);
        assert_eq!(feb_2028.end, date(2028, 2, 29));
    }

    #[test]
    fn months_are_ordered_by_year_then_month() {
        let buckets = month_buckets(&BTreeSet::from([2026, 2025]));
        assert_eq!(buckets[0].label, "Jan 2025");
        assert_eq!(buckets[11].end, date(2025, 12, 31));
        assert_eq!(buckets[12].label, "Jan 2026");
    }

    #[test]
    fn january_has_five_weeks_with_short_tail() {
        let weeks = week_buckets(2025, 0).expect("valid month");
        let labels: Vec<_> = weeks.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["1-7", "8-14", "15-21", "22-28", "29-31"]);

        let last = weeks.last().expect("has weeks");
        assert_eq!(last.start, date(2025, 1, 29));
        assert_eq!(last.end, date(2025, 1, 31));
        assert_eq!((last.end - last.start).num_days() + 1, 3);
    }

    #[test]
    fn february_non_leap_has_four_full_weeks() {
        let weeks = week_buckets(2025, 1).expect("valid month");
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[3].end, date(2025, 2, 28));
        assert_eq!(days_in_month(2028, 1), Some(29));
    }

    #[test]
    fn invalid_month_index_is_rejected() {
        assert!(week_buckets(2025, 12).is_err());
    }

    #[test]
    fn matches_is_inclusive() {
        let weeks = week_buckets(2025, 2).expect("valid month");
        let second = &weeks[1];
        assert!(matches(date(2025, 3, 8), second));
        assert!(matches(date(2025, 3, 14), second));
        assert!(!matches(date(2025, 3, 7), second));
        assert!(!matches(date(2025, 3, 15), second));
    }

    #[test]
    fn filter_round_trips_through_wire_format() {
        let filter: TimeFilter = "2025-03-01_2025-03-31".parse().expect("valid filter");
        assert_eq!(filter.to_string(), "2025-03-01_2025-03-31");
        assert_eq!(filter.active_month(), Some((2025, 2)));
        assert!(filter.contains(date(2025, 3, 31)));
        assert!(!filter.contains(date(2025, 4, 1)));

        assert_eq!("all".parse::<TimeFilter>(), Ok(TimeFilter::All));
        assert_eq!("".parse::<TimeFilter>(), Ok(TimeFilter::All));
        assert!("2025-03-01".parse::<TimeFilter>().is_err());
        assert!("2025-03-31_2025-03-01".parse::<TimeFilter>().is_err());
    }

    #[test]
    fn selecting_a_week_narrows_the_month() {
        let months = month_buckets(&BTreeSet::from([2025]));
        let weeks = week_buckets(2025, 0).expect("valid month");
        let month = &months[0];
        let week = &weeks[2];

        let month_filter = TimeFilter::select(month);
        assert!(month_filter.is_selected(month));

        let week_filter = TimeFilter::select(week);
        assert!(week_filter.is_selected(week));
        assert!(!week_filter.is_selected(month));
        assert_eq!(week_filter.active_month(), Some((2025, 0)));
    }
}
