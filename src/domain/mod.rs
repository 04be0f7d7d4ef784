//! Contract-tracking domain: value objects, the status distribution model,
//! date buckets, aggregation and role scoping.

pub mod access;
pub mod contract;
pub mod credential;
pub mod period;
pub mod status;
pub mod summary;
pub mod team;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;
