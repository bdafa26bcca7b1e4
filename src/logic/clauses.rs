use std::sync::Arc;

use crate::error::{ContractError, ContractResult};
use crate::model::{Clause, ClauseType, Id, NewClause};
use crate::store::traits::ClauseStore;

/// Header/content clauses attached to contracts
///
/// Clauses accumulate: attaching never replaces an earlier clause. Lookups
/// resolve duplicates by returning the most recently attached one.
pub struct ClauseBook<S> {
    store: Arc<S>,
}

impl<S: ClauseStore> ClauseBook<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn attach_clause(&self, new_clause: NewClause) -> ContractResult<Clause> {
        if new_clause.contract_id.trim().is_empty() {
            return Err(ContractError::invalid_submission(
                "contractId",
                "must not be empty",
            ));
        }

        let clause = Clause::from_new(new_clause);
        self.store.insert_clause(clause.clone()).await?;
        log::info!(
            "Attached {} clause {} to contract {}",
            clause.clause_type,
            clause.id,
            clause.contract_id
        );
        Ok(clause)
    }

    /// Best-effort removal; a missing id is not an error
    pub async fn remove_clause(&self, id: &Id) -> ContractResult<bool> {
        let removed = self.store.delete_clause(id).await?;
        if removed {
            log::info!("Removed clause {}", id);
        } else {
            log::debug!("Clause {} was already gone", id);
        }
        Ok(removed)
    }

    /// Current clause of a type, if any
    pub async fn find_clause(
        &self,
        contract_id: &Id,
        clause_type: ClauseType,
    ) -> ContractResult<Option<Clause>> {
        Ok(self.store.latest_clause(contract_id, clause_type).await?)
    }

    pub async fn get_clause(
        &self,
        contract_id: &Id,
        clause_type: ClauseType,
    ) -> ContractResult<Clause> {
        self.find_clause(contract_id, clause_type)
            .await?
            .ok_or_else(|| {
                ContractError::not_found("clause", format!("{}/{}", contract_id, clause_type))
            })
    }

    /// Text of the current clause, empty when none is attached
    pub async fn clause_text(
        &self,
        contract_id: &Id,
        clause_type: ClauseType,
    ) -> ContractResult<String> {
        Ok(self
            .find_clause(contract_id, clause_type)
            .await?
            .map(|clause| clause.text)
            .unwrap_or_default())
    }

    pub async fn list_clauses(&self, contract_id: &Id) -> ContractResult<Vec<Clause>> {
        Ok(self.store.list_clauses(contract_id).await?)
    }
}
