use crate::api::handlers::{submission_body, AppState, MessageResponse};
use crate::error::ContractError;
use crate::model::{Clause, Contract, ContractInstance, Id, NewClause, NewContract};
use crate::store::traits::Store;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTypesResponse {
    pub contracts_types: Vec<Contract>,
}

#[derive(Debug, Serialize)]
pub struct ClausesResponse {
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Serialize)]
pub struct InstancesResponse {
    pub instances: Vec<ContractInstance>,
}

/// POST /contract/type
pub async fn create_contract<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<NewContract>, JsonRejection>,
) -> Result<(StatusCode, Json<Contract>), ContractError> {
    let new_contract = submission_body(payload)?;
    let contract = state.contracts().register_contract(new_contract).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// GET /contract/types
pub async fn list_contracts<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<ContractTypesResponse>, ContractError> {
    let contracts_types = state.contracts().list_contracts().await?;
    Ok(Json(ContractTypesResponse { contracts_types }))
}

/// GET /contract/{id}/instances
pub async fn list_contract_instances<S: Store>(
    State(state): State<AppState<S>>,
    Path(contract_id): Path<Id>,
) -> Result<Json<InstancesResponse>, ContractError> {
    let instances = state.contracts().list_instances(&contract_id).await?;
    Ok(Json(InstancesResponse { instances }))
}

/// POST /clause
pub async fn attach_clause<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<NewClause>, JsonRejection>,
) -> Result<(StatusCode, Json<Clause>), ContractError> {
    let new_clause = submission_body(payload)?;
    let clause = state.clauses().attach_clause(new_clause).await?;
    Ok((StatusCode::CREATED, Json(clause)))
}

/// GET /clause/contract/{contract_id}
pub async fn list_clauses<S: Store>(
    State(state): State<AppState<S>>,
    Path(contract_id): Path<Id>,
) -> Result<Json<ClausesResponse>, ContractError> {
    let clauses = state.clauses().list_clauses(&contract_id).await?;
    Ok(Json(ClausesResponse { clauses }))
}

/// DELETE /clause/{id}
/// Succeeds whether or not the clause still existed
pub async fn remove_clause<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Id>,
) -> Result<Json<MessageResponse>, ContractError> {
    state.clauses().remove_clause(&id).await?;
    Ok(Json(MessageResponse::new("Clause deleted.")))
}

/// POST /generate
/// The body is taken as raw JSON so shape errors can name the offending field
pub async fn generate_contract<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ContractError> {
    let body = submission_body(payload)?;
    let document = state.composer().generate(&body).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, document.content_disposition()),
        ],
        document.bytes,
    )
        .into_response())
}
