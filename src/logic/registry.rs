use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{ContractError, ContractResult};
use crate::logic::validate::validate_template;
use crate::model::{FormTemplate, FormTemplateUpdate, Id, NewFormTemplate, TemplateSummary};
use crate::store::traits::TemplateStore;

/// Authoring and lookup of form templates
pub struct TemplateRegistry<S> {
    store: Arc<S>,
}

impl<S: TemplateStore> TemplateRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a template with all its fields in one atomic write
    pub async fn define_template(
        &self,
        new_template: NewFormTemplate,
    ) -> ContractResult<FormTemplate> {
        let template = FormTemplate::from_new(new_template);
        validate_template(&template)?;

        if !self.store.insert_template(template.clone()).await? {
            log::warn!("Rejected duplicate template '{}'", template.template_type);
            return Err(ContractError::DuplicateTemplate(template.template_type));
        }

        log::info!(
            "Defined template '{}' with {} fields",
            template.template_type,
            template.fields.len()
        );
        Ok(template)
    }

    /// Template with fields sorted by position, if defined
    pub async fn find_template(&self, template_type: &str) -> ContractResult<Option<FormTemplate>> {
        log::debug!("Fetching template '{}'", template_type);
        Ok(self.store.get_template(template_type).await?)
    }

    pub async fn get_template(&self, template_type: &str) -> ContractResult<FormTemplate> {
        self.find_template(template_type)
            .await?
            .ok_or_else(|| ContractError::not_found("template", template_type))
    }

    pub async fn list_summaries(&self) -> ContractResult<Vec<TemplateSummary>> {
        Ok(self.store.list_template_summaries().await?)
    }

    pub async fn list_templates(&self) -> ContractResult<Vec<FormTemplate>> {
        Ok(self.store.list_templates().await?)
    }

    /// Replace the label and revise the named fields in place
    ///
    /// Each entry targets one stored field, by `id` when given and by `name`
    /// otherwise. Fields not mentioned keep their current definition. The
    /// revised template is validated as a whole before anything is written.
    pub async fn update_template(
        &self,
        template_type: &str,
        update: FormTemplateUpdate,
    ) -> ContractResult<FormTemplate> {
        let mut template = self.get_template(template_type).await?;
        let mut touched = HashSet::new();

        for (index, entry) in update.fields.into_iter().enumerate() {
            let slot = match (&entry.id, &entry.name) {
                (Some(id), _) => template.fields.iter().position(|f| &f.id == id),
                (None, Some(name)) => template.fields.iter().position(|f| &f.name == name),
                (None, None) => {
                    return Err(ContractError::invalid_template(
                        format!("inputs[{}]", index),
                        "needs an id or a name to match a field",
                    ))
                }
            }
            .ok_or_else(|| ContractError::not_found("field", entry.match_key()))?;

            if !touched.insert(slot) {
                return Err(ContractError::invalid_template(
                    entry.match_key(),
                    "is updated more than once",
                ));
            }
            template.fields[slot].apply_update(entry);
        }

        template.label = update.label;
        template.updated_at = Utc::now();
        template.sort_fields();
        validate_template(&template)?;

        if !self.store.update_template(template.clone()).await? {
            // Deleted between the read and the write
            return Err(ContractError::not_found("template", template_type));
        }

        log::info!(
            "Updated template '{}' ({} fields revised)",
            template_type,
            touched.len()
        );
        Ok(template)
    }

    /// Remove the template and all of its fields atomically
    pub async fn delete_template(&self, template_type: &str) -> ContractResult<()> {
        if !self.store.delete_template(template_type).await? {
            return Err(ContractError::not_found("template", template_type));
        }
        log::info!("Deleted template '{}'", template_type);
        Ok(())
    }

    pub async fn count_fields(&self, template_id: &Id) -> ContractResult<usize> {
        Ok(self.store.count_fields(template_id).await?)
    }
}
