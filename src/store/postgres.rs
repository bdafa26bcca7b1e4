use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::model::{
    Clause, ClauseType, Contract, ContractInstance, ContractSubmission, FieldDef, FieldOption,
    FormTemplate, Id, TemplateSummary,
};
use crate::store::traits::{ClauseStore, ContractStore, Store, TemplateStore};

/// Forms joined to their inputs; one row per input, or one row with NULL
/// input columns for a form without inputs. A single statement so readers
/// see a consistent snapshot of a template and its fields.
const TEMPLATE_ROWS_SQL: &str = r#"
    SELECT f.id AS form_id, f.type AS form_type, f.label, f.created_at, f.updated_at,
           i.id AS input_id, i.type AS input_type, i.required, i.question_label,
           i.name, i.position, i.options
    FROM contract_forms f
    LEFT JOIN contract_form_inputs i ON i.form_id = f.id
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn field_from_row(row: &PgRow) -> Result<Option<FieldDef>> {
    let Some(id) = row.try_get::<Option<String>, _>("input_id")? else {
        return Ok(None);
    };
    let field_type: String = row.try_get("input_type")?;
    let options: Option<Json<Vec<FieldOption>>> = row.try_get("options")?;

    Ok(Some(FieldDef {
        id,
        field_type: field_type.parse()?,
        required: row.try_get("required")?,
        question_label: row.try_get("question_label")?,
        name: row.try_get("name")?,
        position: row.try_get("position")?,
        options: options.map(|json| json.0),
    }))
}

/// Fold joined rows (ordered by form, then position) into templates
fn templates_from_rows(rows: &[PgRow]) -> Result<Vec<FormTemplate>> {
    let mut templates = Vec::new();
    for (form_id, group) in &rows
        .iter()
        .chunk_by(|row| row.try_get::<String, _>("form_id").ok())
    {
        let group: Vec<&PgRow> = group.collect();
        let (Some(id), Some(first)) = (form_id, group.first()) else {
            anyhow::bail!("Template row without an id");
        };

        let mut fields = Vec::with_capacity(group.len());
        for row in &group {
            if let Some(field) = field_from_row(row)? {
                fields.push(field);
            }
        }

        templates.push(FormTemplate {
            id,
            template_type: first.try_get("form_type")?,
            label: first.try_get("label")?,
            fields,
            created_at: first.try_get("created_at")?,
            updated_at: first.try_get("updated_at")?,
        });
    }
    Ok(templates)
}

fn clause_from_row(row: &PgRow) -> Result<Clause> {
    let clause_type: String = row.try_get("type")?;
    Ok(Clause {
        id: row.try_get("id")?,
        contract_id: row.try_get("contract_id")?,
        clause_type: clause_type.parse()?,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
    })
}

fn contract_from_row(row: &PgRow) -> Result<Contract> {
    Ok(Contract {
        id: row.try_get("id")?,
        contract_type: row.try_get("type")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait::async_trait]
impl TemplateStore for PostgresStore {
    async fn get_template(&self, template_type: &str) -> Result<Option<FormTemplate>> {
        let rows = sqlx::query(&format!(
            "{} WHERE f.type = $1 ORDER BY i.position",
            TEMPLATE_ROWS_SQL
        ))
        .bind(template_type)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch template")?;

        Ok(templates_from_rows(&rows)?.into_iter().next())
    }

    async fn list_template_summaries(&self) -> Result<Vec<TemplateSummary>> {
        let rows = sqlx::query("SELECT type, id, label FROM contract_forms ORDER BY type")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list templates")?;

        rows.iter()
            .map(|row| -> Result<TemplateSummary> {
                Ok(TemplateSummary {
                    template_type: row.try_get("type")?,
                    id: row.try_get("id")?,
                    label: row.try_get("label")?,
                })
            })
            .collect()
    }

    async fn list_templates(&self) -> Result<Vec<FormTemplate>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY f.type, i.position",
            TEMPLATE_ROWS_SQL
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list templates")?;

        templates_from_rows(&rows)
    }

    async fn insert_template(&self, template: FormTemplate) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO contract_forms (id, type, label, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (type) DO NOTHING
            "#,
        )
        .bind(&template.id)
        .bind(&template.template_type)
        .bind(&template.label)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert template")?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await.context("Failed to roll back transaction")?;
            return Ok(false);
        }

        for field in &template.fields {
            sqlx::query(
                r#"
                INSERT INTO contract_form_inputs
                    (id, form_id, type, required, question_label, name, position, options)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&field.id)
            .bind(&template.id)
            .bind(field.field_type.as_str())
            .bind(field.required)
            .bind(&field.question_label)
            .bind(&field.name)
            .bind(field.position)
            .bind(field.options.as_ref().map(Json))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert field '{}'", field.name))?;
        }

        tx.commit().await.context("Failed to commit template")?;
        Ok(true)
    }

    async fn update_template(&self, template: FormTemplate) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        let updated = sqlx::query(
            "UPDATE contract_forms SET label = $1, updated_at = $2 WHERE id = $3 AND type = $4",
        )
        .bind(&template.label)
        .bind(template.updated_at)
        .bind(&template.id)
        .bind(&template.template_type)
        .execute(&mut *tx)
        .await
        .context("Failed to update template")?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.context("Failed to roll back transaction")?;
            return Ok(false);
        }

        for field in &template.fields {
            sqlx::query(
                r#"
                UPDATE contract_form_inputs
                SET type = $1, required = $2, question_label = $3, name = $4,
                    position = $5, options = $6
                WHERE id = $7 AND form_id = $8
                "#,
            )
            .bind(field.field_type.as_str())
            .bind(field.required)
            .bind(&field.question_label)
            .bind(&field.name)
            .bind(field.position)
            .bind(field.options.as_ref().map(Json))
            .bind(&field.id)
            .bind(&template.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update field '{}'", field.name))?;
        }

        tx.commit().await.context("Failed to commit template update")?;
        Ok(true)
    }

    async fn delete_template(&self, template_type: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        let form_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM contract_forms WHERE type = $1 FOR UPDATE")
                .bind(template_type)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to fetch template")?;

        let Some(form_id) = form_id else {
            tx.rollback().await.context("Failed to roll back transaction")?;
            return Ok(false);
        };

        sqlx::query("DELETE FROM contract_form_inputs WHERE form_id = $1")
            .bind(&form_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete template fields")?;

        sqlx::query("DELETE FROM contract_forms WHERE id = $1")
            .bind(&form_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete template")?;

        tx.commit().await.context("Failed to commit template deletion")?;
        Ok(true)
    }

    async fn count_fields(&self, template_id: &Id) -> Result<usize> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contract_form_inputs WHERE form_id = $1")
                .bind(template_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count template fields")?;

        Ok(usize::try_from(count)?)
    }
}

#[async_trait::async_trait]
impl ClauseStore for PostgresStore {
    async fn insert_clause(&self, clause: Clause) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contract_clauses (id, contract_id, type, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&clause.id)
        .bind(&clause.contract_id)
        .bind(clause.clause_type.as_str())
        .bind(&clause.text)
        .bind(clause.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert clause")?;

        Ok(())
    }

    async fn delete_clause(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contract_clauses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete clause")?;

        Ok(result.rows_affected() > 0)
    }

    async fn latest_clause(
        &self,
        contract_id: &Id,
        clause_type: ClauseType,
    ) -> Result<Option<Clause>> {
        let row = sqlx::query(
            r#"
            SELECT id, contract_id, type, text, created_at
            FROM contract_clauses
            WHERE contract_id = $1 AND type = $2
            ORDER BY seq DESC
            LIMIT 1
            "#,
        )
        .bind(contract_id)
        .bind(clause_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch clause")?;

        row.as_ref().map(clause_from_row).transpose()
    }

    async fn list_clauses(&self, contract_id: &Id) -> Result<Vec<Clause>> {
        let rows = sqlx::query(
            r#"
            SELECT id, contract_id, type, text, created_at
            FROM contract_clauses
            WHERE contract_id = $1
            ORDER BY seq
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list clauses")?;

        rows.iter().map(clause_from_row).collect()
    }
}

#[async_trait::async_trait]
impl ContractStore for PostgresStore {
    async fn insert_contract(&self, contract: Contract) -> Result<()> {
        sqlx::query("INSERT INTO contracts (id, type, created_at) VALUES ($1, $2, $3)")
            .bind(&contract.id)
            .bind(&contract.contract_type)
            .bind(contract.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to insert contract")?;

        Ok(())
    }

    async fn get_contract(&self, id: &Id) -> Result<Option<Contract>> {
        let row = sqlx::query("SELECT id, type, created_at FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch contract")?;

        row.as_ref().map(contract_from_row).transpose()
    }

    async fn list_contracts(&self) -> Result<Vec<Contract>> {
        let rows = sqlx::query("SELECT id, type, created_at FROM contracts ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list contracts")?;

        rows.iter().map(contract_from_row).collect()
    }

    async fn insert_instance(&self, instance: ContractInstance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contract_instances (id, contract_id, type, submission, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.submission.contract_id)
        .bind(&instance.submission.template_type)
        .bind(Json(&instance.submission))
        .bind(instance.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to record contract instance")?;

        Ok(())
    }

    async fn list_instances_for_contract(
        &self,
        contract_id: &Id,
    ) -> Result<Vec<ContractInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT id, submission, created_at
            FROM contract_instances
            WHERE contract_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list contract instances")?;

        rows.iter()
            .map(|row| -> Result<ContractInstance> {
                let submission: Json<ContractSubmission> = row.try_get("submission")?;
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                Ok(ContractInstance {
                    id: row.try_get("id")?,
                    submission: submission.0,
                    created_at,
                })
            })
            .collect()
    }
}

impl Store for PostgresStore {}
