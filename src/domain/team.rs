//! Sales teams and the roster of agents belonging to them.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{MemberId, SalespersonName, TypeConstraintError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    Amoraga,
    David,
    Sandra,
}

impl Team {
    pub const ALL: [Team; 3] = [Team::Amoraga, Team::David, Team::Sandra];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Amoraga => "AMORAGA",
            Team::David => "DAVID",
            Team::Sandra => "SANDRA",
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Team {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AMORAGA" => Ok(Team::Amoraga),
            "DAVID" => Ok(Team::David),
            "SANDRA" => Ok(Team::Sandra),
            other => Err(TypeConstraintError::UnknownTeam(other.to_string())),
        }
    }
}

/// An agent's membership in a team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: MemberId,
    pub name: SalespersonName,
    pub team: Team,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTeamMembership {
    pub name: SalespersonName,
    pub team: Team,
}

impl NewTeamMembership {
    #[must_use]
    pub fn new(name: SalespersonName, team: Team) -> Self {
        Self { name, team }
    }
}

/// Snapshot of team membership loaded from the store for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    teams: BTreeMap<Team, Vec<SalespersonName>>,
}

impl Roster {
    pub fn from_memberships<I>(memberships: I) -> Self
    where
        I: IntoIterator<Item = TeamMembership>,
    {
        let mut teams: BTreeMap<Team, Vec<SalespersonName>> =
            Team::ALL.iter().map(|team| (*team, Vec::new())).collect();
        for membership in memberships {
            teams.entry(membership.team).or_default().push(membership.name);
        }
        Self { teams }
    }

    /// Members of a team in insertion order.
    pub fn members(&self, team: Team) -> &[SalespersonName] {
        self.teams.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact name membership test, as used for team-scoped visibility.
    pub fn contains(&self, team: Team, name: &str) -> bool {
        self.members(team).iter().any(|member| member.as_str() == name)
    }

    /// Team of the given agent, if any.
    pub fn team_of(&self, name: &str) -> Option<Team> {
        self.teams
            .iter()
            .find(|(_, members)| members.iter().any(|member| member.as_str() == name))
            .map(|(team, _)| *team)
    }

    /// Every agent across all teams, without duplicates, in team order.
    pub fn all_salespeople(&self) -> Vec<SalespersonName> {
        let mut seen = Vec::new();
        for member in self.teams.values().flatten() {
            if !seen.contains(member) {
                seen.push(member.clone());
            }
        }
        seen
    }
}
