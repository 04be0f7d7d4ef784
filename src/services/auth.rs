//! Shared-password login for managers and agents.

use validator::Validate;

use crate::domain::access::AuthenticatedUser;
use crate::domain::credential::CredentialKey;
use crate::domain::types::SalespersonName;
use crate::forms::FormError;
use crate::forms::auth::{AgentLoginForm, ManagerLoginForm};
use crate::repository::{CredentialReader, TeamReader};
use crate::services::main::load_roster;
use crate::services::{ServiceError, ServiceResult};

/// Compares `candidate` with the stored password for `key`.
///
/// A missing credential never matches.
pub fn verify_password<R>(repo: &R, key: CredentialKey, candidate: &str) -> ServiceResult<bool>
where
    R: CredentialReader + ?Sized,
{
    let credential = repo.get_credential(key).map_err(|err| {
        log::error!("Failed to read credential {key}: {err}");
        err
    })?;

    match credential {
        Some(credential) => Ok(credential.matches(candidate)),
        None => {
            log::warn!("Credential {key} is not configured; rejecting login");
            Ok(false)
        }
    }
}

pub fn login_manager<R>(repo: &R, form: ManagerLoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: CredentialReader + ?Sized,
{
    form.validate().map_err(FormError::from)?;
    let team = form.team()?;

    if !verify_password(repo, CredentialKey::ManagerPassword, &form.password)? {
        return Err(ServiceError::Unauthorized);
    }
    Ok(AuthenticatedUser::manager(team))
}

/// Agents pick their name from the roster and share one password.
pub fn login_agent<R>(repo: &R, form: AgentLoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: CredentialReader + TeamReader + ?Sized,
{
    form.validate().map_err(FormError::from)?;
    let name = form.name()?;

    if !verify_password(repo, CredentialKey::CommercialPassword, &form.password)? {
        return Err(ServiceError::Unauthorized);
    }

    let roster = load_roster(repo)?;
    if roster.team_of(name.as_str()).is_none() {
        return Err(ServiceError::Form(format!("{name} is not on any team")));
    }
    Ok(AuthenticatedUser::agent(&name))
}

/// Names offered on the agent login form, in team order.
pub fn login_names<R>(repo: &R) -> ServiceResult<Vec<String>>
where
    R: TeamReader + ?Sized,
{
    let roster = load_roster(repo)?;
    Ok(roster
        .all_salespeople()
        .into_iter()
        .map(SalespersonName::into_inner)
        .collect())
}
