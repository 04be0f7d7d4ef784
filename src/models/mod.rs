//! Database and wire models backing the contract tracker.

pub mod config;
pub mod contract;
pub mod credential;
pub mod team;
pub mod zmq;
