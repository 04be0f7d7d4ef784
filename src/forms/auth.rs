use serde::Deserialize;
use validator::Validate;

use crate::domain::team::Team;
use crate::domain::types::SalespersonName;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct ManagerLoginForm {
    #[validate(length(min = 1))]
    pub password: String,
    /// Blank selects the unrestricted manager role.
    #[serde(default)]
    pub team: Option<String>,
}

impl ManagerLoginForm {
    pub fn team(&self) -> Result<Option<Team>, FormError> {
        match self.team.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| FormError::InvalidTeam),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AgentLoginForm {
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
}

impl AgentLoginForm {
    pub fn name(&self) -> Result<SalespersonName, FormError> {
        SalespersonName::new(self.name.as_str()).map_err(|_| FormError::InvalidName)
    }
}
