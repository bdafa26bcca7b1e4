use crate::model::{default_timestamp, generate_id, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered contract; its id is the join key for clauses and submissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Id,
    #[serde(rename = "type")]
    pub contract_type: String,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Contract {
    pub fn from_new(new_contract: NewContract) -> Self {
        Self {
            id: generate_id(),
            contract_type: new_contract.contract_type,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContract {
    #[serde(rename = "type")]
    pub contract_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalProviderData {
    pub provider_full_name: String,
    pub provider_document: String,
    pub provider_address: String,
    pub provider_address_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_complement: Option<String>,
    pub provider_city: String,
    pub provider_state: String,
    pub provider_cep: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalCustomerData {
    pub customer_full_name: String,
    pub customer_document: String,
    pub customer_address: String,
    pub customer_address_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_complement: Option<String>,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_cep: String,
}

/// Prefix-free view over either party record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Party<'a> {
    pub full_name: &'a str,
    pub document: &'a str,
    pub address: &'a str,
    pub address_number: i64,
    pub complement: Option<&'a str>,
    pub city: &'a str,
    pub state: &'a str,
    pub cep: &'a str,
}

impl Party<'_> {
    /// e.g. "Rua A, 12 (Apto 3) - Recife/PE, CEP 50000-000"
    pub fn address_line(&self) -> String {
        let complement = self
            .complement
            .filter(|c| !c.trim().is_empty())
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();
        format!(
            "{}, {}{} - {}/{}, CEP {}",
            self.address, self.address_number, complement, self.city, self.state, self.cep
        )
    }
}

impl PersonalProviderData {
    pub fn party(&self) -> Party<'_> {
        Party {
            full_name: &self.provider_full_name,
            document: &self.provider_document,
            address: &self.provider_address,
            address_number: self.provider_address_number,
            complement: self.provider_complement.as_deref(),
            city: &self.provider_city,
            state: &self.provider_state,
            cep: &self.provider_cep,
        }
    }
}

impl PersonalCustomerData {
    pub fn party(&self) -> Party<'_> {
        Party {
            full_name: &self.customer_full_name,
            document: &self.customer_document,
            address: &self.customer_address,
            address_number: self.customer_address_number,
            complement: self.customer_complement.as_deref(),
            city: &self.customer_city,
            state: &self.customer_state,
            cep: &self.customer_cep,
        }
    }
}

/// A filled submission against a form template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSubmission {
    #[serde(rename = "type")]
    pub template_type: String,
    pub project_duration: String,
    pub project_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(rename = "contract_id")]
    pub contract_id: Id,
    pub personal_provider_data: PersonalProviderData,
    pub personal_customer_data: PersonalCustomerData,
    /// Values for the template's own fields, keyed by field name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, serde_json::Value>,
}

/// A recorded submission. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInstance {
    pub id: Id,
    #[serde(flatten)]
    pub submission: ContractSubmission,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ContractInstance {
    pub fn from_submission(submission: ContractSubmission) -> Self {
        Self {
            id: generate_id(),
            submission,
            created_at: Utc::now(),
        }
    }
}
