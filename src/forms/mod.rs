//! Form definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod contracts;
pub mod team;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("Please fill in every required field")]
    Validation(#[from] ValidationErrors),

    #[error("Unknown contract type")]
    InvalidContractType,

    #[error("Invalid phone number")]
    InvalidPhoneNumber,

    #[error("Enter one CUPS code for each supply point")]
    InvalidCupsCodes,

    #[error("Unknown team")]
    InvalidTeam,

    #[error("Invalid name")]
    InvalidName,

    #[error("Invalid identifier")]
    InvalidId,

    #[error("Choose a status")]
    MissingStatus,

    #[error("Deletion must be confirmed")]
    NotConfirmed,
}
