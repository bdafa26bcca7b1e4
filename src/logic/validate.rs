use chrono::NaiveDate;
use itertools::Itertools;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

use crate::error::{ContractError, ContractResult};
use crate::model::{ComposedField, ContractSubmission, FieldDef, FieldType, FormTemplate};

/// What a submission key must hold
#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Text,
    OptionalText,
    Integer,
    Record(&'static [(&'static str, Expect)]),
    OptionalRecord,
}

const PROVIDER_SHAPE: &[(&str, Expect)] = &[
    ("providerFullName", Expect::Text),
    ("providerDocument", Expect::Text),
    ("providerAddress", Expect::Text),
    ("providerAddressNumber", Expect::Integer),
    ("providerComplement", Expect::OptionalText),
    ("providerCity", Expect::Text),
    ("providerState", Expect::Text),
    ("providerCep", Expect::Text),
];

const CUSTOMER_SHAPE: &[(&str, Expect)] = &[
    ("customerFullName", Expect::Text),
    ("customerDocument", Expect::Text),
    ("customerAddress", Expect::Text),
    ("customerAddressNumber", Expect::Integer),
    ("customerComplement", Expect::OptionalText),
    ("customerCity", Expect::Text),
    ("customerState", Expect::Text),
    ("customerCep", Expect::Text),
];

const SUBMISSION_SHAPE: &[(&str, Expect)] = &[
    ("type", Expect::Text),
    ("projectDuration", Expect::Text),
    ("projectValue", Expect::Text),
    ("observation", Expect::OptionalText),
    ("contract_id", Expect::Text),
    ("personalProviderData", Expect::Record(PROVIDER_SHAPE)),
    ("personalCustomerData", Expect::Record(CUSTOMER_SHAPE)),
    ("answers", Expect::OptionalRecord),
];

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn check_shape(
    object: &Map<String, Value>,
    shape: &[(&str, Expect)],
    prefix: &str,
) -> ContractResult<()> {
    for (key, expect) in shape {
        let path = join_path(prefix, key);
        let value = object.get(*key).filter(|v| !v.is_null());

        match (expect, value) {
            (Expect::OptionalText | Expect::OptionalRecord, None) => {}
            (_, None) => return Err(ContractError::invalid_submission(path, "is required")),
            (Expect::Text | Expect::OptionalText, Some(v)) if !v.is_string() => {
                return Err(ContractError::invalid_submission(path, "must be a string"))
            }
            (Expect::Integer, Some(v)) if v.as_i64().is_none() => {
                return Err(ContractError::invalid_submission(path, "must be an integer"))
            }
            (Expect::Record(inner), Some(v)) => match v.as_object() {
                Some(nested) => check_shape(nested, inner, &path)?,
                None => return Err(ContractError::invalid_submission(path, "must be an object")),
            },
            (Expect::OptionalRecord, Some(v)) if !v.is_object() => {
                return Err(ContractError::invalid_submission(path, "must be an object"))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Check a raw submission against the fixed contract shape and parse it
///
/// The first offending key is reported by its dotted path, e.g.
/// `personalProviderData.providerFullName`.
pub fn parse_submission(raw: &Value) -> ContractResult<ContractSubmission> {
    let object = raw
        .as_object()
        .ok_or_else(|| ContractError::invalid_submission("submission", "must be an object"))?;

    check_shape(object, SUBMISSION_SHAPE, "")?;

    serde_json::from_value(raw.clone())
        .map_err(|e| ContractError::invalid_submission("submission", e.to_string()))
}

/// Enforce the field invariants of a template before it is written
pub fn validate_template(template: &FormTemplate) -> ContractResult<()> {
    if template.template_type.trim().is_empty() {
        return Err(ContractError::invalid_template("type", "must not be empty"));
    }
    if template.label.trim().is_empty() {
        return Err(ContractError::invalid_template("label", "must not be empty"));
    }

    let mut names = HashSet::new();
    let mut positions = HashSet::new();
    for field in &template.fields {
        validate_field(field)?;

        if !names.insert(field.name.as_str()) {
            return Err(ContractError::invalid_template(
                &field.name,
                "name is used by more than one field",
            ));
        }
        if !positions.insert(field.position) {
            return Err(ContractError::invalid_template(
                &field.name,
                format!("position {} is used by more than one field", field.position),
            ));
        }
    }
    Ok(())
}

fn validate_field(field: &FieldDef) -> ContractResult<()> {
    if field.name.trim().is_empty() {
        return Err(ContractError::invalid_template(
            format!("position {}", field.position),
            "name must not be empty",
        ));
    }

    match (&field.options, field.field_type.is_choice()) {
        (None, true) => Err(ContractError::invalid_template(
            &field.name,
            format!("{} fields need at least one option", field.field_type),
        )),
        (Some(options), true) if options.is_empty() => Err(ContractError::invalid_template(
            &field.name,
            format!("{} fields need at least one option", field.field_type),
        )),
        (Some(_), false) => Err(ContractError::invalid_template(
            &field.name,
            format!("{} fields do not take options", field.field_type),
        )),
        _ => match field.option_ids().duplicates().next() {
            Some(duplicate) => Err(ContractError::invalid_template(
                &field.name,
                format!("option id '{}' is used more than once", duplicate),
            )),
            None => Ok(()),
        },
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render one answer for the document, or explain why it does not fit the field
fn answer_text(field: &FieldDef, value: &Value) -> Result<String, String> {
    match field.field_type {
        FieldType::Text => match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err("must be a string".to_string()),
        },
        FieldType::Select | FieldType::Radio => {
            let chosen = value.as_str().ok_or("must be an option id")?;
            field
                .options
                .iter()
                .flatten()
                .find(|option| option.id == chosen)
                .map(|option| option.label.clone())
                .ok_or_else(|| format!("'{}' is not one of the field's options", chosen))
        }
        FieldType::Date => {
            let raw = value.as_str().ok_or("must be a date string")?;
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(|date| date.format("%d/%m/%Y").to_string())
                .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", raw))
        }
        FieldType::Currency => {
            let amount = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
                _ => None,
            };
            amount
                .filter(|a| a.is_finite())
                .map(|a| format!("{:.2}", a))
                .ok_or_else(|| "must be a numeric amount".to_string())
        }
        FieldType::PersonalProviderData | FieldType::PersonalClientData => {
            Err("is filled from the party records".to_string())
        }
    }
}

/// Check submitted answers against the template and lay them out in position order
///
/// Party fields are satisfied by the fixed provider/customer records and
/// never read from `answers`.
pub fn compose_answers(
    template: &FormTemplate,
    answers: &BTreeMap<String, Value>,
) -> ContractResult<Vec<ComposedField>> {
    if let Some(unknown) = answers.keys().find(|name| template.field(name).is_none()) {
        return Err(ContractError::invalid_submission(
            format!("answers.{}", unknown),
            format!("is not a field of template '{}'", template.template_type),
        ));
    }

    let mut composed = Vec::new();
    for field in template
        .fields
        .iter()
        .sorted_by_key(|field| field.position)
    {
        let path = format!("answers.{}", field.name);
        let value = answers.get(&field.name).filter(|v| !is_blank(v));

        if field.field_type.is_party_data() {
            if value.is_some() {
                return Err(ContractError::invalid_submission(
                    path,
                    "is filled from the party records",
                ));
            }
            continue;
        }

        let Some(value) = value else {
            if field.required {
                return Err(ContractError::invalid_submission(path, "is required"));
            }
            continue;
        };

        let text = answer_text(field, value)
            .map_err(|reason| ContractError::invalid_submission(&path, reason))?;
        composed.push(ComposedField {
            name: field.name.clone(),
            label: field.question_label.clone(),
            value: text,
        });
    }
    Ok(composed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldOption, NewFieldDef, NewFormTemplate};
    use serde_json::json;

    fn valid_submission() -> Value {
        json!({
            "type": "design",
            "projectDuration": "3 months",
            "projectValue": "1500",
            "contract_id": "c-1",
            "personalProviderData": {
                "providerFullName": "Ana Lima", "providerDocument": "111",
                "providerAddress": "Rua A", "providerAddressNumber": 10,
                "providerCity": "Recife", "providerState": "PE",
                "providerCep": "50000-000"
            },
            "personalCustomerData": {
                "customerFullName": "Bia Souza", "customerDocument": "222",
                "customerAddress": "Rua B", "customerAddressNumber": 20,
                "customerCity": "Olinda", "customerState": "PE",
                "customerCep": "53000-000"
            }
        })
    }

    fn field(name: &str, field_type: FieldType, position: i32, required: bool) -> NewFieldDef {
        let options = field_type.is_choice().then(|| {
            vec![
                FieldOption { id: "logo".to_string(), label: "Logo design".to_string() },
                FieldOption { id: "site".to_string(), label: "Website".to_string() },
            ]
        });
        NewFieldDef {
            field_type,
            required,
            question_label: format!("{}?", name),
            name: name.to_string(),
            position,
            options,
        }
    }

    fn template(fields: Vec<NewFieldDef>) -> FormTemplate {
        FormTemplate::from_new(NewFormTemplate {
            template_type: "design".to_string(),
            label: "Design".to_string(),
            fields,
        })
    }

    #[test]
    fn test_valid_submission_parses() {
        let submission = parse_submission(&valid_submission()).unwrap();
        assert_eq!(submission.personal_provider_data.provider_full_name, "Ana Lima");
        assert!(submission.observation.is_none());
        assert!(submission.answers.is_empty());
    }

    #[test]
    fn test_missing_nested_field_is_named_by_path() {
        let mut raw = valid_submission();
        raw["personalProviderData"]
            .as_object_mut()
            .unwrap()
            .remove("providerFullName");

        match parse_submission(&raw) {
            Err(ContractError::InvalidSubmission { field, .. }) => {
                assert_eq!(field, "personalProviderData.providerFullName")
            }
            other => panic!("expected InvalidSubmission, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatches_are_rejected() {
        let mut raw = valid_submission();
        raw["personalCustomerData"]["customerAddressNumber"] = json!("20");
        match parse_submission(&raw) {
            Err(ContractError::InvalidSubmission { field, reason }) => {
                assert_eq!(field, "personalCustomerData.customerAddressNumber");
                assert_eq!(reason, "must be an integer");
            }
            other => panic!("expected InvalidSubmission, got {:?}", other),
        }

        let mut raw = valid_submission();
        raw["observation"] = json!(42);
        assert!(matches!(
            parse_submission(&raw),
            Err(ContractError::InvalidSubmission { field, .. }) if field == "observation"
        ));

        assert!(parse_submission(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_null_optional_fields_are_accepted() {
        let mut raw = valid_submission();
        raw["observation"] = Value::Null;
        raw["personalProviderData"]["providerComplement"] = Value::Null;
        assert!(parse_submission(&raw).is_ok());
    }

    #[test]
    fn test_template_rules() {
        assert!(validate_template(&template(vec![
            field("scope", FieldType::Text, 0, true),
            field("kind", FieldType::Select, 1, true),
        ]))
        .is_ok());

        let duplicate_position = template(vec![
            field("scope", FieldType::Text, 0, true),
            field("deadline", FieldType::Date, 0, false),
        ]);
        assert!(matches!(
            validate_template(&duplicate_position),
            Err(ContractError::InvalidTemplate { .. })
        ));

        let duplicate_name = template(vec![
            field("scope", FieldType::Text, 0, true),
            field("scope", FieldType::Date, 1, false),
        ]);
        assert!(validate_template(&duplicate_name).is_err());

        let mut radio_without_options = field("kind", FieldType::Radio, 0, true);
        radio_without_options.options = Some(Vec::new());
        assert!(validate_template(&template(vec![radio_without_options])).is_err());

        let mut text_with_options = field("scope", FieldType::Text, 0, true);
        text_with_options.options = Some(vec![FieldOption {
            id: "x".to_string(),
            label: "X".to_string(),
        }]);
        assert!(validate_template(&template(vec![text_with_options])).is_err());
    }

    #[test]
    fn test_answers_follow_position_order_and_option_labels() {
        let template = template(vec![
            field("deadline", FieldType::Date, 5, false),
            field("kind", FieldType::Radio, 1, true),
            field("budget", FieldType::Currency, 3, false),
            field("provider", FieldType::PersonalProviderData, 0, true),
        ]);
        let answers = BTreeMap::from([
            ("deadline".to_string(), json!("2025-02-01")),
            ("kind".to_string(), json!("site")),
            ("budget".to_string(), json!("1200,5")),
        ]);

        let composed = compose_answers(&template, &answers).unwrap();
        let values: Vec<(&str, &str)> = composed
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![("kind", "Website"), ("budget", "1200.50"), ("deadline", "01/02/2025")]
        );
    }

    #[test]
    fn test_answer_errors_name_the_field() {
        let template = template(vec![
            field("scope", FieldType::Text, 0, true),
            field("kind", FieldType::Select, 1, false),
        ]);

        let missing = compose_answers(&template, &BTreeMap::new());
        assert!(matches!(
            missing,
            Err(ContractError::InvalidSubmission { field, .. }) if field == "answers.scope"
        ));

        let unknown = BTreeMap::from([
            ("scope".to_string(), json!("Logo")),
            ("color".to_string(), json!("red")),
        ]);
        assert!(matches!(
            compose_answers(&template, &unknown),
            Err(ContractError::InvalidSubmission { field, .. }) if field == "answers.color"
        ));

        let bad_option = BTreeMap::from([
            ("scope".to_string(), json!("Logo")),
            ("kind".to_string(), json!("video")),
        ]);
        assert!(matches!(
            compose_answers(&template, &bad_option),
            Err(ContractError::InvalidSubmission { field, .. }) if field == "answers.kind"
        ));
    }
}
