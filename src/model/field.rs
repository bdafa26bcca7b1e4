use crate::model::{generate_id, Id};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of input a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Select,
    Text,
    Radio,
    Date,
    Currency,
    PersonalProviderData,
    PersonalClientData,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Select,
        FieldType::Text,
        FieldType::Radio,
        FieldType::Date,
        FieldType::Currency,
        FieldType::PersonalProviderData,
        FieldType::PersonalClientData,
    ];

    /// Wire/storage name, e.g. `personalProviderData`
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Select => "select",
            FieldType::Text => "text",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::Currency => "currency",
            FieldType::PersonalProviderData => "personalProviderData",
            FieldType::PersonalClientData => "personalClientData",
        }
    }

    /// Select and radio pick from a closed set of options
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    /// Party fields are filled from the fixed provider/customer records
    /// rather than from free-form answers.
    pub fn is_party_data(&self) -> bool {
        matches!(
            self,
            FieldType::PersonalProviderData | FieldType::PersonalClientData
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown field type '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: String,
    pub label: String,
}

/// One input slot of a form template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub id: Id,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub question_label: String,
    /// Machine key, used to match answers and updates
    pub name: String,
    /// Render and merge order within the template
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldDef {
    pub fn from_new(new_field: NewFieldDef) -> Self {
        Self {
            id: generate_id(),
            field_type: new_field.field_type,
            required: new_field.required,
            question_label: new_field.question_label,
            name: new_field.name,
            position: new_field.position,
            options: new_field.options,
        }
    }

    /// Apply a partial update, keeping the id
    pub fn apply_update(&mut self, update: FieldDefUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(field_type) = update.field_type {
            self.field_type = field_type;
        }
        if let Some(required) = update.required {
            self.required = required;
        }
        if let Some(question_label) = update.question_label {
            self.question_label = question_label;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if update.options.is_some() {
            self.options = update.options;
        } else if !self.field_type.is_choice() {
            // Switching away from a choice kind drops the stale option list
            self.options = None;
        }
    }

    /// Option ids in their authored order
    pub fn option_ids(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .flatten()
            .map(|option| option.id.as_str())
    }
}

/// Field input model for template creation; the id is always server-generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFieldDef {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub question_label: String,
    pub name: String,
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

/// Field update model for PUT operations
///
/// The entry is matched against the stored field by `id` when present,
/// otherwise by `name`. Every other attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldDefUpdate {
    /// Key used in error messages when the entry matches nothing
    pub fn match_key(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names_round_trip() {
        for kind in FieldType::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
            assert_eq!(kind.as_str().parse::<FieldType>().unwrap(), kind);
        }
        assert!("checkbox".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_def_uses_camel_case_wire_format() {
        let json = r#"{
            "type": "select",
            "required": true,
            "questionLabel": "Which plan?",
            "name": "plan",
            "position": 2,
            "options": [{"id": "basic", "label": "Basic"}]
        }"#;

        let new_field: NewFieldDef = serde_json::from_str(json).unwrap();
        assert_eq!(new_field.field_type, FieldType::Select);
        assert_eq!(new_field.question_label, "Which plan?");

        let field = FieldDef::from_new(new_field);
        let out = serde_json::to_value(&field).unwrap();
        assert_eq!(out["questionLabel"], "Which plan?");
        assert_eq!(out["type"], "select");
        assert_eq!(out["options"][0]["id"], "basic");
    }

    #[test]
    fn test_apply_update_drops_options_when_leaving_choice_kind() {
        let mut field = FieldDef::from_new(NewFieldDef {
            field_type: FieldType::Radio,
            required: false,
            question_label: "Pick one".to_string(),
            name: "pick".to_string(),
            position: 0,
            options: Some(vec![FieldOption {
                id: "a".to_string(),
                label: "A".to_string(),
            }]),
        });
        let id = field.id.clone();

        field.apply_update(FieldDefUpdate {
            name: Some("pick".to_string()),
            field_type: Some(FieldType::Text),
            ..Default::default()
        });

        assert_eq!(field.id, id);
        assert_eq!(field.field_type, FieldType::Text);
        assert!(field.options.is_none());
        assert_eq!(field.position, 0);
    }
}
