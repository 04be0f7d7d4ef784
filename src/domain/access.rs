//! Roles, capabilities and the role-based scoping of contracts.

use serde::{Deserialize, Serialize};

use crate::domain::contract::Contract;
use crate::domain::period::TimeFilter;
use crate::domain::team::{Roster, Team};
use crate::domain::types::SalespersonName;

/// Closed set of dashboard roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "team", rename_all = "snake_case")]
pub enum Role {
    /// Commercial agent; sees and creates only their own contracts.
    Agent,
    /// Manager scoped to one team's roster.
    TeamManager(Team),
    /// Unrestricted manager.
    Manager,
}

/// Identity carried by the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub role: Role,
    /// Agent name for agents, display name for managers.
    pub name: String,
}

impl AuthenticatedUser {
    pub fn agent(name: &SalespersonName) -> Self {
        Self {
            role: Role::Agent,
            name: name.as_str().to_string(),
        }
    }

    pub fn manager(team: Option<Team>) -> Self {
        match team {
            Some(team) => Self {
                role: Role::TeamManager(team),
                name: format!("Gerente {team}"),
            },
            None => Self {
                role: Role::Manager,
                name: "Gerente".to_string(),
            },
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self.role, Role::TeamManager(_) | Role::Manager)
    }

    pub fn can_delete(&self) -> bool {
        self.is_manager()
    }

    /// Managers see the client's identity and bank details; agents do not.
    pub fn can_see_client_details(&self) -> bool {
        self.is_manager()
    }

    /// Whether this user may add or remove members of `team`.
    pub fn can_manage(&self, team: Team) -> bool {
        match self.role {
            Role::Agent => false,
            Role::TeamManager(own) => own == team,
            Role::Manager => true,
        }
    }

    /// Whether a contract owned by `salesperson` falls within this user's scope.
    pub fn can_access(&self, salesperson: Option<&str>, roster: &Roster) -> bool {
        match self.role {
            Role::Agent => salesperson.is_some_and(|name| same_agent(name, &self.name)),
            Role::TeamManager(team) => salesperson.is_some_and(|name| roster.contains(team, name)),
            Role::Manager => true,
        }
    }

    /// Salespeople this user may record a contract for.
    pub fn assignable_salespeople(&self, roster: &Roster) -> Vec<SalespersonName> {
        match self.role {
            Role::Agent => SalespersonName::new(self.name.as_str()).into_iter().collect(),
            Role::TeamManager(team) => roster.members(team).to_vec(),
            Role::Manager => roster.all_salespeople(),
        }
    }

    pub fn can_assign(&self, salesperson: &SalespersonName, roster: &Roster) -> bool {
        match self.role {
            Role::Agent => same_agent(salesperson.as_str(), &self.name),
            Role::TeamManager(team) => roster.contains(team, salesperson.as_str()),
            Role::Manager => roster.team_of(salesperson.as_str()).is_some(),
        }
    }
}

fn same_agent(stored: &str, current: &str) -> bool {
    stored.trim().to_lowercase() == current.trim().to_lowercase()
}

/// Keeps the contracts within the user's role scope.
pub fn visible_to(
    contracts: Vec<Contract>,
    user: &AuthenticatedUser,
    roster: &Roster,
) -> Vec<Contract> {
    if user.role == Role::Manager {
        return contracts;
    }
    contracts
        .into_iter()
        .filter(|contract| {
            user.can_access(
                contract.salesperson.as_ref().map(SalespersonName::as_str),
                roster,
            )
        })
        .collect()
}

/// Applies the date filter, then the role scope. Every listing, summary and
/// export goes through this.
pub fn scope_contracts(
    contracts: Vec<Contract>,
    filter: &TimeFilter,
    user: &AuthenticatedUser,
    roster: &Roster,
) -> Vec<Contract> {
    visible_to(filter.apply(contracts), user, roster)
}
