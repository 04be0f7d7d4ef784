use diesel::prelude::*;

use crate::domain::team::{NewTeamMembership, TeamMembership};
use crate::domain::types::MemberId;
use crate::models::team::{NewSalesperson, Salesperson};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TeamReader, TeamWriter};

impl TeamReader for DieselRepository {
    fn list_team_members(&self) -> RepositoryResult<Vec<TeamMembership>> {
        use crate::schema::salespeople;

        let mut conn = self.conn()?;
        let rows = salespeople::table
            .order(salespeople::id.asc())
            .select(Salesperson::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| TeamMembership::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl TeamWriter for DieselRepository {
    fn add_team_member(&self, member: &NewTeamMembership) -> RepositoryResult<TeamMembership> {
        use crate::schema::salespeople;

        let mut conn = self.conn()?;
        let row = diesel::insert_into(salespeople::table)
            .values(NewSalesperson::from(member))
            .returning(Salesperson::as_returning())
            .get_result(&mut conn)?;

        Ok(TeamMembership::try_from(row)?)
    }

    fn remove_team_member(&self, id: MemberId) -> RepositoryResult<()> {
        use crate::schema::salespeople;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(salespeople::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
