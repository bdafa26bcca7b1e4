use crate::model::ContractSubmission;
use serde::{Deserialize, Serialize};

pub const CONTRACT_FILENAME: &str = "Contrato.pdf";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// One answered template field, carried in position order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedField {
    pub name: String,
    pub label: String,
    pub value: String,
}

/// The record handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedDocument {
    #[serde(flatten)]
    pub submission: ContractSubmission,
    pub template_label: String,
    pub fields: Vec<ComposedField>,
    /// Empty when the contract has no header clause
    pub header_text: String,
    /// Empty when the contract has no content clause
    pub content_text: String,
}

/// Renderer output, tagged for download
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            filename: CONTRACT_FILENAME,
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}
