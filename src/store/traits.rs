use crate::model::{
    Clause, ClauseType, Contract, ContractInstance, FormTemplate, Id, TemplateSummary,
};
use anyhow::Result;

/// Form templates and their field definitions
///
/// Every method that touches a template together with its fields must be
/// all-or-nothing: readers never observe a template without its fields or
/// fields without their template.
#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    /// Get a template by key, fields sorted by position
    async fn get_template(&self, template_type: &str) -> Result<Option<FormTemplate>>;
    /// List `{type, id, label}` for every template
    async fn list_template_summaries(&self) -> Result<Vec<TemplateSummary>>;
    /// List every template with its fields
    async fn list_templates(&self) -> Result<Vec<FormTemplate>>;
    /// Insert a template and all its fields; returns false if the key is taken
    async fn insert_template(&self, template: FormTemplate) -> Result<bool>;
    /// Replace the label and field rows of an existing template
    async fn update_template(&self, template: FormTemplate) -> Result<bool>;
    /// Delete a template and its fields; returns false if it did not exist
    async fn delete_template(&self, template_type: &str) -> Result<bool>;
    /// Number of field rows stored for a template id
    async fn count_fields(&self, template_id: &Id) -> Result<usize>;
}

#[async_trait::async_trait]
pub trait ClauseStore: Send + Sync {
    /// Append a clause; duplicates of the same type are kept
    async fn insert_clause(&self, clause: Clause) -> Result<()>;
    /// Delete by id; returns false if nothing was removed
    async fn delete_clause(&self, id: &Id) -> Result<bool>;
    /// Most recently attached clause of a type for a contract
    async fn latest_clause(
        &self,
        contract_id: &Id,
        clause_type: ClauseType,
    ) -> Result<Option<Clause>>;
    /// All clauses of a contract in attachment order
    async fn list_clauses(&self, contract_id: &Id) -> Result<Vec<Clause>>;
}

#[async_trait::async_trait]
pub trait ContractStore: Send + Sync {
    async fn insert_contract(&self, contract: Contract) -> Result<()>;
    async fn get_contract(&self, id: &Id) -> Result<Option<Contract>>;
    async fn list_contracts(&self) -> Result<Vec<Contract>>;
    /// Record a generated submission
    async fn insert_instance(&self, instance: ContractInstance) -> Result<()>;
    /// Submissions recorded for a contract, oldest first
    async fn list_instances_for_contract(
        &self,
        contract_id: &Id,
    ) -> Result<Vec<ContractInstance>>;
}

pub trait Store: TemplateStore + ClauseStore + ContractStore + Send + Sync {}
