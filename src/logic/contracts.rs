use std::sync::Arc;

use crate::error::{ContractError, ContractResult};
use crate::model::{Contract, ContractInstance, Id, NewContract};
use crate::store::traits::ContractStore;

/// Registered contracts and their recorded submissions
pub struct ContractRegistry<S> {
    store: Arc<S>,
}

impl<S: ContractStore> ContractRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a contract; its id becomes the clause join key
    pub async fn register_contract(&self, new_contract: NewContract) -> ContractResult<Contract> {
        if new_contract.contract_type.trim().is_empty() {
            return Err(ContractError::invalid_submission("type", "must not be empty"));
        }

        let contract = Contract::from_new(new_contract);
        self.store.insert_contract(contract.clone()).await?;
        log::info!("Registered {} contract {}", contract.contract_type, contract.id);
        Ok(contract)
    }

    pub async fn get_contract(&self, id: &Id) -> ContractResult<Contract> {
        self.store
            .get_contract(id)
            .await?
            .ok_or_else(|| ContractError::not_found("contract", id.as_str()))
    }

    pub async fn list_contracts(&self) -> ContractResult<Vec<Contract>> {
        Ok(self.store.list_contracts().await?)
    }

    pub async fn list_instances(&self, contract_id: &Id) -> ContractResult<Vec<ContractInstance>> {
        Ok(self.store.list_instances_for_contract(contract_id).await?)
    }
}
