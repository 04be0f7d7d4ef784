//! View models handed to templates and JSON responses.

pub mod api;
pub mod main;
pub mod team;
