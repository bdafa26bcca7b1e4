use crate::model::{default_timestamp, generate_id, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseType {
    Header,
    Content,
}

impl ClauseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::Header => "header",
            ClauseType::Content => "content",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClauseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(ClauseType::Header),
            "content" => Ok(ClauseType::Content),
            other => Err(anyhow::anyhow!("Unknown clause type '{}'", other)),
        }
    }
}

/// Free-text fragment attached to a contract
///
/// `contract_id` is a lookup key only; clauses are not owned by the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub id: Id,
    pub contract_id: Id,
    #[serde(rename = "type")]
    pub clause_type: ClauseType,
    pub text: String,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Clause {
    pub fn from_new(new_clause: NewClause) -> Self {
        Self {
            id: generate_id(),
            contract_id: new_clause.contract_id,
            clause_type: new_clause.clause_type,
            text: new_clause.text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClause {
    pub contract_id: Id,
    #[serde(rename = "type")]
    pub clause_type: ClauseType,
    pub text: String,
}
