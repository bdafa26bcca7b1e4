use crate::model::{default_timestamp, generate_id, FieldDef, FieldDefUpdate, Id, NewFieldDef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, ordered schema of input fields
///
/// `template_type` is the lookup key and is unique across all templates.
/// Fields are kept sorted by `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: Id,
    #[serde(rename = "type")]
    pub template_type: String,
    pub label: String,
    #[serde(rename = "inputs")]
    pub fields: Vec<FieldDef>,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl FormTemplate {
    pub fn from_new(new_template: NewFormTemplate) -> Self {
        let now = Utc::now();
        let mut template = Self {
            id: generate_id(),
            template_type: new_template.template_type,
            label: new_template.label,
            fields: new_template
                .fields
                .into_iter()
                .map(FieldDef::from_new)
                .collect(),
            created_at: now,
            updated_at: now,
        };
        template.sort_fields();
        template
    }

    pub fn sort_fields(&mut self) {
        self.fields.sort_by_key(|field| field.position);
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            template_type: self.template_type.clone(),
            label: self.label.clone(),
        }
    }
}

/// Template input model for creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFormTemplate {
    #[serde(rename = "type")]
    pub template_type: String,
    pub label: String,
    #[serde(rename = "inputs")]
    pub fields: Vec<NewFieldDef>,
}

/// Template update model for PUT operations
///
/// The label is replaced; each field entry revises one stored field in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplateUpdate {
    pub label: String,
    #[serde(rename = "inputs", default)]
    pub fields: Vec<FieldDefUpdate>,
}

/// Lightweight listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    #[serde(rename = "type")]
    pub template_type: String,
    pub id: Id,
    pub label: String,
}
