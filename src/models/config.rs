//! Configuration models loaded from external sources.

use std::collections::BTreeSet;

use serde::Deserialize;

fn default_filter_years() -> BTreeSet<i32> {
    BTreeSet::from([2025, 2026])
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for the HTTP server.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Signs the session cookie and the identity token.
    pub secret: String,
    /// Years offered by the month strip.
    #[serde(default = "default_filter_years")]
    pub filter_years: BTreeSet<i32>,
}

fn default_manager_length() -> usize {
    10
}

fn default_commercial_length() -> usize {
    8
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for the `rotate_passwords` binary.
pub struct RotationConfig {
    pub database_url: String,
    pub zmq_emailer_pub: String,
    /// Addresses receiving the new passwords.
    pub rotation_recipients: Vec<String>,
    #[serde(default = "default_manager_length")]
    pub manager_password_length: usize,
    #[serde(default = "default_commercial_length")]
    pub commercial_password_length: usize,
}
