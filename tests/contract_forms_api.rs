use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use contract_forms::seed::load_seed_data;
use contract_forms::{create_router, AppState, InMemoryStore, PdfRenderer};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// Test client wrapper driving the router in-process
struct TestClient {
    app: Router,
}

struct TestResponse {
    status: StatusCode,
    content_type: Option<String>,
    content_disposition: Option<String>,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

impl TestClient {
    fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    /// Client over a store holding the sample `design` and `development` templates
    async fn seeded() -> Self {
        let store = Arc::new(InMemoryStore::new());
        load_seed_data(store.clone()).await.unwrap();
        Self::with_store(store)
    }

    fn with_store(store: Arc<InMemoryStore>) -> Self {
        let state = AppState::new(store, Arc::new(PdfRenderer::default()));
        Self {
            app: create_router::<InMemoryStore>().with_state(state),
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_value(header::CONTENT_TYPE);
        let content_disposition = header_value(header::CONTENT_DISPOSITION);
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            content_type,
            content_disposition,
            body,
        }
    }

    async fn post(&self, path: &str, json: Value) -> TestResponse {
        self.send(Method::POST, path, Some(json)).await
    }

    async fn put(&self, path: &str, json: Value) -> TestResponse {
        self.send(Method::PUT, path, Some(json)).await
    }

    async fn get(&self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    async fn delete(&self, path: &str) -> TestResponse {
        self.send(Method::DELETE, path, None).await
    }
}

fn design_form() -> Value {
    json!({
        "type": "design",
        "label": "Design",
        "inputs": [
            {
                "type": "text",
                "required": true,
                "questionLabel": "Describe the scope",
                "name": "scope",
                "position": 0
            }
        ]
    })
}

fn submission(contract_id: &str) -> Value {
    json!({
        "type": "design",
        "projectDuration": "3 meses",
        "projectValue": "5000",
        "observation": "Pagamento em duas parcelas",
        "contract_id": contract_id,
        "personalProviderData": {
            "providerFullName": "Ana Souza",
            "providerDocument": "123.456.789-00",
            "providerAddress": "Rua das Flores",
            "providerAddressNumber": 42,
            "providerCity": "Recife",
            "providerState": "PE",
            "providerCep": "50000-000"
        },
        "personalCustomerData": {
            "customerFullName": "Loja Azul Ltda",
            "customerDocument": "12.345.678/0001-90",
            "customerAddress": "Avenida Central",
            "customerAddressNumber": 1000,
            "customerComplement": "Sala 3",
            "customerCity": "Olinda",
            "customerState": "PE",
            "customerCep": "53000-000"
        },
        "answers": { "scope": "Nova identidade visual" }
    })
}

#[tokio::test]
async fn test_health_check() {
    let client = TestClient::new();

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_template_lifecycle() {
    let client = TestClient::new();

    let created = client.post("/form", design_form()).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let created = created.json();
    assert_eq!(created["type"], "design");
    assert_eq!(created["inputs"].as_array().unwrap().len(), 1);

    let summaries = client.get("/form/types").await.json();
    let summaries = summaries["contractsFormsTypes"].as_array().unwrap().clone();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["label"], "Design");

    let fetched = client.get("/form/design").await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(
        fetched.json()["contractFormType"]["inputs"][0]["name"],
        "scope"
    );

    let all = client.get("/").await.json();
    assert_eq!(all["contractsTypes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_template_conflicts() {
    let client = TestClient::new();

    assert_eq!(
        client.post("/form", design_form()).await.status,
        StatusCode::CREATED
    );

    let again = client.post("/form", design_form()).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert!(again.json()["error"].as_str().unwrap().contains("design"));

    let summaries = client.get("/form/types").await.json();
    assert_eq!(summaries["contractsFormsTypes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_template_rejected() {
    let client = TestClient::new();

    let mut form = design_form();
    form["inputs"][0]["type"] = json!("select");

    let response = client.post("/form", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(client.get("/form/design").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_template_fields() {
    let client = TestClient::new();
    client.post("/form", design_form()).await;

    let response = client
        .put(
            "/form/design",
            json!({
                "label": "Design gráfico",
                "inputs": [
                    { "name": "scope", "questionLabel": "What is delivered?", "required": false }
                ]
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let updated = response.json();
    assert_eq!(updated["label"], "Design gráfico");
    assert_eq!(updated["inputs"][0]["questionLabel"], "What is delivered?");
    assert_eq!(updated["inputs"][0]["required"], false);

    let unknown = client
        .put(
            "/form/design",
            json!({ "label": "Design", "inputs": [{ "name": "budget", "required": true }] }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let missing = client.put("/form/branding", json!({ "label": "X" })).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_template() {
    let client = TestClient::new();
    client.post("/form", design_form()).await;

    let deleted = client.delete("/form/design").await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["message"], "Contract type deleted.");

    assert_eq!(client.get("/form/design").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        client.delete("/form/design").await.status,
        StatusCode::NOT_FOUND
    );

    // The type can be defined again once removed
    assert_eq!(
        client.post("/form", design_form()).await.status,
        StatusCode::CREATED
    );
}

#[tokio::test]
async fn test_clause_lifecycle() {
    let client = TestClient::new();

    let contract = client.post("/contract/type", json!({ "type": "design" })).await;
    assert_eq!(contract.status, StatusCode::CREATED);
    let contract_id = contract.json()["id"].as_str().unwrap().to_string();

    let types = client.get("/contract/types").await.json();
    assert_eq!(types["contractsTypes"].as_array().unwrap().len(), 1);

    let clause = client
        .post(
            "/clause",
            json!({ "contractId": contract_id, "type": "header", "text": "Preamble" }),
        )
        .await;
    assert_eq!(clause.status, StatusCode::CREATED);
    let clause_id = clause.json()["id"].as_str().unwrap().to_string();

    let listed = client
        .get(&format!("/clause/contract/{}", contract_id))
        .await
        .json();
    let clauses = listed["clauses"].as_array().unwrap();
    assert_eq!(clauses.len(), 1);
    assert_eq!(clauses[0]["text"], "Preamble");
    assert_eq!(clauses[0]["type"], "header");

    let removed = client.delete(&format!("/clause/{}", clause_id)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.json()["message"], "Clause deleted.");

    // Removing again is still a success
    let removed_again = client.delete(&format!("/clause/{}", clause_id)).await;
    assert_eq!(removed_again.status, StatusCode::OK);

    let listed = client
        .get(&format!("/clause/contract/{}", contract_id))
        .await
        .json();
    assert!(listed["clauses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_missing_provider_name() {
    let client = TestClient::new();
    client.post("/form", design_form()).await;

    let mut body = submission("contract-1");
    body["personalProviderData"]
        .as_object_mut()
        .unwrap()
        .remove("providerFullName");

    let response = client.post("/generate", body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .contains("personalProviderData.providerFullName"));
}

#[tokio::test]
async fn test_generate_answers_for_undefined_template() {
    let client = TestClient::new();

    let response = client.post("/generate", submission("contract-1")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].as_str().unwrap().contains("answers"));
}

#[tokio::test]
async fn test_generate_without_answers_against_seeded_templates() {
    let client = TestClient::seeded().await;

    for template_type in ["design", "development", "branding"] {
        let mut body = submission("contract-1");
        body["type"] = json!(template_type);
        body.as_object_mut().unwrap().remove("answers");

        let response = client.post("/generate", body).await;
        assert_eq!(response.status, StatusCode::OK, "type {}", template_type);
        assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
    }
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let client = TestClient::new();

    let mut form = design_form();
    form["inputs"][0]["type"] = json!("checkbox");
    let response = client.post("/form", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert!(response.json()["error"].as_str().unwrap().contains("checkbox"));

    let mut form = design_form();
    form.as_object_mut().unwrap().remove("label");
    assert_eq!(
        client.post("/form", form).await.status,
        StatusCode::BAD_REQUEST
    );

    let clause = client
        .post(
            "/clause",
            json!({ "contractId": "c-1", "type": "footer", "text": "x" }),
        )
        .await;
    assert_eq!(clause.status, StatusCode::BAD_REQUEST);
    assert!(clause.json()["error"].is_string());

    let contract = client.post("/contract/type", json!({ "kind": "design" })).await;
    assert_eq!(contract.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_pdf_and_record_instance() {
    let client = TestClient::new();
    client.post("/form", design_form()).await;

    let contract = client.post("/contract/type", json!({ "type": "design" })).await;
    let contract_id = contract.json()["id"].as_str().unwrap().to_string();

    client
        .post(
            "/clause",
            json!({ "contractId": contract_id, "type": "header", "text": "Preamble" }),
        )
        .await;
    client
        .post(
            "/clause",
            json!({ "contractId": contract_id, "type": "content", "text": "Cláusula primeira" }),
        )
        .await;

    let response = client.post("/generate", submission(&contract_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
    assert!(response
        .content_disposition
        .as_deref()
        .unwrap()
        .contains("Contrato.pdf"));
    assert!(response.body.starts_with(b"%PDF-"));

    let instances = client
        .get(&format!("/contract/{}/instances", contract_id))
        .await
        .json();
    let instances = instances["instances"].as_array().unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["projectValue"], "5000");
    assert_eq!(
        instances[0]["personalProviderData"]["providerFullName"],
        "Ana Souza"
    );
}
