use serde_json::Value;
use std::sync::Arc;

use crate::error::{ContractError, ContractResult};
use crate::logic::clauses::ClauseBook;
use crate::logic::registry::TemplateRegistry;
use crate::logic::render::DocumentRenderer;
use crate::logic::validate::{compose_answers, parse_submission};
use crate::model::{ClauseType, ComposedDocument, ContractInstance, RenderedDocument};
use crate::store::traits::Store;

/// Merges a submission with its contract's clauses and renders the result
pub struct DocumentComposer<S> {
    store: Arc<S>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl<S: Store> DocumentComposer<S> {
    pub fn new(store: Arc<S>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { store, renderer }
    }

    /// Build the renderer payload without rendering or recording anything
    ///
    /// Shape errors are reported before any lookup. A contract without
    /// clauses composes with empty header and content text. `answers` is
    /// optional: without it the document carries only the fixed sections,
    /// and the template named by `type` need not be defined.
    pub async fn compose(&self, raw: &Value) -> ContractResult<ComposedDocument> {
        let submission = parse_submission(raw)?;

        let template = TemplateRegistry::new(self.store.clone())
            .find_template(&submission.template_type)
            .await?;
        let template_label = template
            .as_ref()
            .map(|template| template.label.clone())
            .unwrap_or_else(|| submission.template_type.clone());

        let fields = match (&template, submission.answers.is_empty()) {
            (_, true) => Vec::new(),
            (Some(template), false) => compose_answers(template, &submission.answers)?,
            (None, false) => {
                return Err(ContractError::invalid_submission(
                    "answers",
                    format!("template '{}' is not defined", submission.template_type),
                ))
            }
        };

        let clauses = ClauseBook::new(self.store.clone());
        let header_text = clauses
            .clause_text(&submission.contract_id, ClauseType::Header)
            .await?;
        let content_text = clauses
            .clause_text(&submission.contract_id, ClauseType::Content)
            .await?;

        Ok(ComposedDocument {
            submission,
            template_label,
            fields,
            header_text,
            content_text,
        })
    }

    /// Compose, render and record the submission
    ///
    /// Renderer failures are returned as `CompositionFailed`; the submission
    /// is only recorded once a document was produced.
    pub async fn generate(&self, raw: &Value) -> ContractResult<RenderedDocument> {
        let composed = self.compose(raw).await?;

        let bytes = self.renderer.render(&composed).map_err(|e| {
            log::error!(
                "Rendering contract {} failed: {:#}",
                composed.submission.contract_id,
                e
            );
            ContractError::CompositionFailed(e.to_string())
        })?;

        let instance = ContractInstance::from_submission(composed.submission);
        let instance_id = instance.id.clone();
        let contract_id = instance.submission.contract_id.clone();
        self.store.insert_instance(instance).await?;

        log::info!(
            "Generated contract document for {} (instance {}, {} bytes)",
            contract_id,
            instance_id,
            bytes.len()
        );
        Ok(RenderedDocument::pdf(bytes))
    }
}
