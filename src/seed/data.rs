use crate::error::ContractError;
use crate::logic::TemplateRegistry;
use crate::model::{FieldOption, FieldType, NewFieldDef, NewFormTemplate};
use crate::store::traits::Store;
use anyhow::Result;
use std::sync::Arc;

fn field(
    field_type: FieldType,
    name: &str,
    question_label: &str,
    position: i32,
    required: bool,
) -> NewFieldDef {
    NewFieldDef {
        field_type,
        required,
        question_label: question_label.to_string(),
        name: name.to_string(),
        position,
        options: None,
    }
}

fn choice(
    field_type: FieldType,
    name: &str,
    question_label: &str,
    position: i32,
    options: &[(&str, &str)],
) -> NewFieldDef {
    NewFieldDef {
        options: Some(
            options
                .iter()
                .map(|(id, label)| FieldOption {
                    id: id.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        ),
        ..field(field_type, name, question_label, position, true)
    }
}

fn party_fields() -> Vec<NewFieldDef> {
    vec![
        field(
            FieldType::PersonalProviderData,
            "personalProviderData",
            "Dados do contratado",
            0,
            true,
        ),
        field(
            FieldType::PersonalClientData,
            "personalCustomerData",
            "Dados do contratante",
            1,
            true,
        ),
    ]
}

pub fn design_template() -> NewFormTemplate {
    let mut fields = party_fields();
    fields.extend([
        choice(
            FieldType::Select,
            "deliverable",
            "Qual o tipo de entrega?",
            2,
            &[
                ("logo", "Logotipo"),
                ("brand", "Identidade visual"),
                ("ui", "Interface de aplicativo"),
            ],
        ),
        choice(
            FieldType::Radio,
            "revisions",
            "Quantas rodadas de revisão?",
            3,
            &[("one", "Uma"), ("two", "Duas"), ("three", "Três")],
        ),
        field(FieldType::Date, "deliveryDate", "Data de entrega", 4, false),
        field(FieldType::Currency, "downPayment", "Valor de entrada", 5, false),
    ]);

    NewFormTemplate {
        template_type: "design".to_string(),
        label: "Design".to_string(),
        fields,
    }
}

pub fn development_template() -> NewFormTemplate {
    let mut fields = party_fields();
    fields.extend([
        field(FieldType::Text, "scope", "Descreva o escopo do projeto", 2, true),
        choice(
            FieldType::Select,
            "platform",
            "Plataforma",
            3,
            &[("web", "Web"), ("mobile", "Mobile"), ("desktop", "Desktop")],
        ),
        field(FieldType::Date, "startDate", "Data de início", 4, true),
        field(FieldType::Currency, "hourlyRate", "Valor da hora", 5, false),
    ]);

    NewFormTemplate {
        template_type: "development".to_string(),
        label: "Desenvolvimento".to_string(),
        fields,
    }
}

/// Define the sample templates, leaving existing ones untouched
pub async fn load_seed_data<S: Store>(store: Arc<S>) -> Result<()> {
    let registry = TemplateRegistry::new(store);

    for template in [design_template(), development_template()] {
        let template_type = template.template_type.clone();
        match registry.define_template(template).await {
            Ok(_) => log::info!("Seeded template '{}'", template_type),
            Err(ContractError::DuplicateTemplate(_)) => {
                log::info!("Template '{}' already present, skipping", template_type)
            }
            Err(e) => return Err(anyhow::anyhow!("Failed to seed '{}': {}", template_type, e)),
        }
    }

    Ok(())
}
