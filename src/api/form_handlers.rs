use crate::api::handlers::{template_body, AppState, MessageResponse};
use crate::error::ContractError;
use crate::model::{FormTemplate, FormTemplateUpdate, NewFormTemplate, TemplateSummary};
use crate::store::traits::Store;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTypesResponse {
    pub contracts_forms_types: Vec<TemplateSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormsResponse {
    pub contracts_types: Vec<FormTemplate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub contract_form_type: FormTemplate,
}

/// GET /
/// Every template with its fields
pub async fn list_forms<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<FormsResponse>, ContractError> {
    let contracts_types = state.templates().list_templates().await?;
    Ok(Json(FormsResponse { contracts_types }))
}

/// GET /form/types
pub async fn list_form_types<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<FormTypesResponse>, ContractError> {
    let contracts_forms_types = state.templates().list_summaries().await?;
    Ok(Json(FormTypesResponse {
        contracts_forms_types,
    }))
}

/// GET /form/{type}
pub async fn get_form<S: Store>(
    State(state): State<AppState<S>>,
    Path(template_type): Path<String>,
) -> Result<Json<FormResponse>, ContractError> {
    let contract_form_type = state.templates().get_template(&template_type).await?;
    Ok(Json(FormResponse { contract_form_type }))
}

/// POST /form
pub async fn create_form<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<NewFormTemplate>, JsonRejection>,
) -> Result<(StatusCode, Json<FormTemplate>), ContractError> {
    let new_template = template_body(payload)?;
    let template = state.templates().define_template(new_template).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /form/{type}
pub async fn update_form<S: Store>(
    State(state): State<AppState<S>>,
    Path(template_type): Path<String>,
    payload: Result<Json<FormTemplateUpdate>, JsonRejection>,
) -> Result<Json<FormTemplate>, ContractError> {
    let update = template_body(payload)?;
    let template = state
        .templates()
        .update_template(&template_type, update)
        .await?;
    Ok(Json(template))
}

/// DELETE /form/{type}
/// Removes the template together with all of its fields
pub async fn delete_form<S: Store>(
    State(state): State<AppState<S>>,
    Path(template_type): Path<String>,
) -> Result<Json<MessageResponse>, ContractError> {
    state.templates().delete_template(&template_type).await?;
    Ok(Json(MessageResponse::new("Contract type deleted.")))
}
