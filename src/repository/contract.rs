use diesel::prelude::*;

use crate::domain::contract::{Contract, NewContract, UpdateContract};
use crate::domain::types::ContractId;
use crate::models::contract::{
    Contract as DbContract, NewContract as DbNewContract, UpdateContract as DbUpdateContract,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContractReader, ContractWriter, DieselRepository};

impl ContractReader for DieselRepository {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;
        let db_contract = contracts::table
            .find(id.get())
            .select(DbContract::as_select())
            .first(&mut conn)
            .optional()?;

        db_contract
            .map(|row| Contract::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_contracts(&self) -> RepositoryResult<Vec<Contract>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;
        let rows = contracts::table
            .order((contracts::date.desc(), contracts::id.desc()))
            .select(DbContract::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| Contract::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl ContractWriter for DieselRepository {
    fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;
        let insertable = DbNewContract::try_from(new_contract)?;

        let row = diesel::insert_into(contracts::table)
            .values(&insertable)
            .returning(DbContract::as_returning())
            .get_result(&mut conn)?;

        Ok(Contract::try_from(row)?)
    }

    fn update_contract(
        &self,
        id: ContractId,
        updates: &UpdateContract,
    ) -> RepositoryResult<Contract> {
        use crate::schema::contracts;

        if updates.is_empty() {
            return self
                .get_contract_by_id(id)?
                .ok_or(RepositoryError::NotFound);
        }

        let mut conn = self.conn()?;
        let changeset = DbUpdateContract::try_from(updates)?;

        let row = diesel::update(contracts::table.find(id.get()))
            .set(&changeset)
            .returning(DbContract::as_returning())
            .get_result(&mut conn)?;

        Ok(Contract::try_from(row)?)
    }

    fn delete_contract(&self, id: ContractId) -> RepositoryResult<()> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(contracts::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
