//! Diesel models for roster entries.

use diesel::prelude::*;

use crate::domain::team::{NewTeamMembership, Team, TeamMembership};
use crate::domain::types::{MemberId, SalespersonName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::salespeople)]
/// Diesel model for [`crate::domain::team::TeamMembership`].
pub struct Salesperson {
    pub id: i32,
    pub name: String,
    pub team: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::salespeople)]
pub struct NewSalesperson<'a> {
    pub name: &'a str,
    pub team: &'static str,
}

impl TryFrom<Salesperson> for TeamMembership {
    type Error = TypeConstraintError;

    fn try_from(row: Salesperson) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MemberId::try_from(row.id)?,
            name: SalespersonName::new(row.name)?,
            team: row.team.parse::<Team>()?,
        })
    }
}

impl<'a> From<&'a NewTeamMembership> for NewSalesperson<'a> {
    fn from(member: &'a NewTeamMembership) -> Self {
        Self {
            name: member.name.as_str(),
            team: member.team.as_str(),
        }
    }
}
