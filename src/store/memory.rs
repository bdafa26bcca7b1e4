use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{
    Clause, ClauseType, Contract, ContractInstance, FormTemplate, Id, TemplateSummary,
};
use crate::store::traits::{ClauseStore, ContractStore, Store, TemplateStore};

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by template type
    templates: HashMap<String, FormTemplate>,
    /// Attachment order is insertion order
    clauses: Vec<Clause>,
    contracts: Vec<Contract>,
    instances: Vec<ContractInstance>,
}

/// Process-local store
///
/// Multi-row writes hold the write lock for their whole duration, which
/// gives them the same all-or-nothing visibility as a Postgres transaction.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TemplateStore for InMemoryStore {
    async fn get_template(&self, template_type: &str) -> Result<Option<FormTemplate>> {
        let tables = self.tables.read();
        Ok(tables.templates.get(template_type).cloned().map(|mut template| {
            template.sort_fields();
            template
        }))
    }

    async fn list_template_summaries(&self) -> Result<Vec<TemplateSummary>> {
        let mut summaries: Vec<TemplateSummary> = self
            .tables
            .read()
            .templates
            .values()
            .map(FormTemplate::summary)
            .collect();
        summaries.sort_by(|a, b| a.template_type.cmp(&b.template_type));
        Ok(summaries)
    }

    async fn list_templates(&self) -> Result<Vec<FormTemplate>> {
        let mut templates: Vec<FormTemplate> =
            self.tables.read().templates.values().cloned().collect();
        templates.sort_by(|a, b| a.template_type.cmp(&b.template_type));
        for template in &mut templates {
            template.sort_fields();
        }
        Ok(templates)
    }

    async fn insert_template(&self, template: FormTemplate) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.templates.contains_key(&template.template_type) {
            return Ok(false);
        }
        tables
            .templates
            .insert(template.template_type.clone(), template);
        Ok(true)
    }

    async fn update_template(&self, template: FormTemplate) -> Result<bool> {
        let mut tables = self.tables.write();
        match tables.templates.get_mut(&template.template_type) {
            Some(existing) if existing.id == template.id => {
                *existing = template;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_template(&self, template_type: &str) -> Result<bool> {
        Ok(self.tables.write().templates.remove(template_type).is_some())
    }

    async fn count_fields(&self, template_id: &Id) -> Result<usize> {
        Ok(self
            .tables
            .read()
            .templates
            .values()
            .filter(|template| &template.id == template_id)
            .map(|template| template.fields.len())
            .sum())
    }
}

#[async_trait::async_trait]
impl ClauseStore for InMemoryStore {
    async fn insert_clause(&self, clause: Clause) -> Result<()> {
        self.tables.write().clauses.push(clause);
        Ok(())
    }

    async fn delete_clause(&self, id: &Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.clauses.len();
        tables.clauses.retain(|clause| &clause.id != id);
        Ok(tables.clauses.len() != before)
    }

    async fn latest_clause(
        &self,
        contract_id: &Id,
        clause_type: ClauseType,
    ) -> Result<Option<Clause>> {
        Ok(self
            .tables
            .read()
            .clauses
            .iter()
            .rev()
            .find(|clause| &clause.contract_id == contract_id && clause.clause_type == clause_type)
            .cloned())
    }

    async fn list_clauses(&self, contract_id: &Id) -> Result<Vec<Clause>> {
        Ok(self
            .tables
            .read()
            .clauses
            .iter()
            .filter(|clause| &clause.contract_id == contract_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl ContractStore for InMemoryStore {
    async fn insert_contract(&self, contract: Contract) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.contracts.iter().any(|existing| existing.id == contract.id) {
            anyhow::bail!("Contract id '{}' already exists", contract.id);
        }
        tables.contracts.push(contract);
        Ok(())
    }

    async fn get_contract(&self, id: &Id) -> Result<Option<Contract>> {
        Ok(self
            .tables
            .read()
            .contracts
            .iter()
            .find(|contract| &contract.id == id)
            .cloned())
    }

    async fn list_contracts(&self) -> Result<Vec<Contract>> {
        Ok(self.tables.read().contracts.clone())
    }

    async fn insert_instance(&self, instance: ContractInstance) -> Result<()> {
        self.tables.write().instances.push(instance);
        Ok(())
    }

    async fn list_instances_for_contract(
        &self,
        contract_id: &Id,
    ) -> Result<Vec<ContractInstance>> {
        Ok(self
            .tables
            .read()
            .instances
            .iter()
            .filter(|instance| &instance.submission.contract_id == contract_id)
            .cloned()
            .collect())
    }
}

impl Store for InMemoryStore {}
