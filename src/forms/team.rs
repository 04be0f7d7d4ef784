use serde::Deserialize;
use validator::Validate;

use crate::domain::team::{NewTeamMembership, Team};
use crate::domain::types::{MemberId, SalespersonName};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub team: String,
}

impl TryFrom<AddMemberForm> for NewTeamMembership {
    type Error = FormError;

    fn try_from(form: AddMemberForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let name = SalespersonName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let team = form.team.parse::<Team>().map_err(|_| FormError::InvalidTeam)?;
        Ok(NewTeamMembership::new(name, team))
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveMemberForm {
    pub id: i32,
}

impl TryFrom<RemoveMemberForm> for MemberId {
    type Error = FormError;

    fn try_from(form: RemoveMemberForm) -> Result<Self, Self::Error> {
        MemberId::new(form.id).map_err(|_| FormError::InvalidId)
    }
}
