//! Roster page and membership changes.

use crate::domain::access::AuthenticatedUser;
use crate::domain::team::{NewTeamMembership, Team};
use crate::domain::types::MemberId;
use crate::dto::team::{MemberView, TeamPageData, TeamView};
use crate::forms::team::{AddMemberForm, RemoveMemberForm};
use crate::repository::{TeamReader, TeamWriter};
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

/// Teams shown on the roster page: a team manager sees their own team,
/// an unrestricted manager sees every team.
pub fn load_team_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<TeamPageData>
where
    R: TeamReader + ?Sized,
{
    if !user.is_manager() {
        return Err(ServiceError::Unauthorized);
    }

    let members = repo.list_team_members().map_err(|err| {
        log::error!("Failed to list team members: {err}");
        err
    })?;

    let teams = Team::ALL
        .iter()
        .filter(|team| user.can_manage(**team))
        .map(|team| TeamView {
            team: team.to_string(),
            members: members
                .iter()
                .filter(|member| member.team == *team)
                .map(|member| MemberView {
                    id: member.id.get(),
                    name: member.name.to_string(),
                })
                .collect(),
        })
        .collect();

    Ok(TeamPageData { teams })
}

pub fn add_member<R>(repo: &R, user: &AuthenticatedUser, form: AddMemberForm) -> ServiceResult<()>
where
    R: TeamWriter + ?Sized,
{
    let member = NewTeamMembership::try_from(form)?;
    if !user.can_manage(member.team) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.add_team_member(&member) {
        Ok(_) => Ok(()),
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Form(format!(
            "{} is already on a team",
            member.name
        ))),
        Err(err) => {
            log::error!("Failed to add {} to {}: {err}", member.name, member.team);
            Err(err.into())
        }
    }
}

pub fn remove_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RemoveMemberForm,
) -> ServiceResult<()>
where
    R: TeamReader + TeamWriter + ?Sized,
{
    if !user.is_manager() {
        return Err(ServiceError::Unauthorized);
    }
    let id = MemberId::try_from(form)?;

    let member = repo
        .list_team_members()?
        .into_iter()
        .find(|member| member.id == id)
        .ok_or(ServiceError::NotFound)?;
    if !user.can_manage(member.team) {
        return Err(ServiceError::Unauthorized);
    }

    repo.remove_team_member(id).map_err(|err| {
        log::error!("Failed to remove {} from {}: {err}", member.name, member.team);
        err
    })?;
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::team::TeamMembership;
    use crate::domain::types::SalespersonName;
    use crate::repository::mock::MockRepository;

    fn membership(id: i32, name: &str, team: Team) -> TeamMembership {
        TeamMembership {
            id: MemberId::new(id).expect("valid id"),
            name: SalespersonName::new(name).expect("valid name"),
            team,
        }
    }

    #[test]
    fn agents_cannot_open_the_roster() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members().times(0);

        let user = AuthenticatedUser::agent(&SalespersonName::new("Ian").expect("valid name"));
        assert!(matches!(
            load_team_page(&repo, &user),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn team_manager_sees_only_their_team() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members().returning(|| {
            Ok(vec![
                membership(1, "Ian", Team::Amoraga),
                membership(2, "Pepe", Team::David),
            ])
        });

        let data = load_team_page(&repo, &AuthenticatedUser::manager(Some(Team::David)))
            .expect("page loads");
        assert_eq!(data.teams.len(), 1);
        assert_eq!(data.teams[0].team, "DAVID");
        assert_eq!(data.teams[0].members[0].name, "Pepe");
    }

    #[test]
    fn team_manager_cannot_add_to_another_team() {
        let mut repo = MockRepository::new();
        repo.expect_add_team_member().times(0);

        let form = AddMemberForm {
            name: "Lizeth".into(),
            team: "SANDRA".into(),
        };
        let result = add_member(&repo, &AuthenticatedUser::manager(Some(Team::David)), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn duplicate_names_are_reported_to_the_user() {
        let mut repo = MockRepository::new();
        repo.expect_add_team_member()
            .returning(|_| Err(RepositoryError::ConstraintViolation("name".into())));

        let form = AddMemberForm {
            name: "Ian".into(),
            team: "AMORAGA".into(),
        };
        let result = add_member(&repo, &AuthenticatedUser::manager(None), form);
        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains("Ian")));
    }

    #[test]
    fn remove_checks_the_member_team() {
        let mut repo = MockRepository::new();
        repo.expect_list_team_members()
            .returning(|| Ok(vec![membership(3, "Ian", Team::Amoraga)]));
        repo.expect_remove_team_member().times(0);

        let result = remove_member(
            &repo,
            &AuthenticatedUser::manager(Some(Team::Sandra)),
            RemoveMemberForm { id: 3 },
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
