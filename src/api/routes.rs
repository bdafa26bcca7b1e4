use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::handlers::AppState;
use crate::api::{contract_handlers, form_handlers, handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Form templates
        .route("/", get(form_handlers::list_forms::<S>))
        .route("/form", post(form_handlers::create_form::<S>))
        .route("/form/types", get(form_handlers::list_form_types::<S>))
        .route(
            "/form/:type",
            get(form_handlers::get_form::<S>)
                .put(form_handlers::update_form::<S>)
                .delete(form_handlers::delete_form::<S>),
        )
        // Contracts
        .route("/contract/type", post(contract_handlers::create_contract::<S>))
        .route("/contract/types", get(contract_handlers::list_contracts::<S>))
        .route(
            "/contract/:id/instances",
            get(contract_handlers::list_contract_instances::<S>),
        )
        // Clauses
        .route("/clause", post(contract_handlers::attach_clause::<S>))
        .route(
            "/clause/contract/:contract_id",
            get(contract_handlers::list_clauses::<S>),
        )
        .route("/clause/:id", delete(contract_handlers::remove_clause::<S>))
        // Document generation
        .route("/generate", post(contract_handlers::generate_contract::<S>))
}
