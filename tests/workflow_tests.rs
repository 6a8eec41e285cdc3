//! End-to-end workflows through the `App` facade.

use keel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct CreatePet {
    #[validate(length(min = 1, max = 40))]
    name: String,
    #[validate(range(min = 0, max = 40))]
    age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
}

#[derive(Default)]
struct PetStore {
    names: Mutex<Vec<String>>,
}

impl PetStore {
    fn add(&self, name: String) -> usize {
        let mut names = self.names.lock().unwrap();
        names.push(name);
        names.len()
    }
}

fn build_app() -> App {
    let mut app = App::new(
        ApiConfig::new("Pet Store", "1.2.0")
            .with_description("Pets and their owners")
            .with_base_path("/api")
            .with_schemes(["https"]),
    );

    app.register_singleton_dependency(|_ctx| Ok(PetStore::default()));

    let container = app.container().clone();
    app.post(
        "/pets",
        handler(move |req| {
            let container = container.clone();
            async move {
                let pet: CreatePet = match bind_request(&req) {
                    Ok(pet) => pet,
                    Err(err) => return Ok(err.to_response()),
                };
                let store = container.resolve::<PetStore>(&req)?;
                let id = store.add(pet.name.clone());
                created(json!({"id": id, "name": pet.name}))
            }
        }),
        [
            with_summary("Create a pet"),
            with_tags(["pets"]),
            with_json_schema(
                &CreatePet {
                    name: "Rex".into(),
                    age: 3,
                    owner: None,
                },
                "Pet to create",
            ),
            with_response(201, "Pet created"),
            with_response(400, "Invalid pet"),
        ],
    );

    {
        let mut owners = app.group("/owners");
        owners.get(
            "/:ownerId",
            handler(|req| async move {
                match req.param("ownerId") {
                    Some(id) => success(json!({"id": id})),
                    None => Err(Error::NotFound("owner".into())),
                }
            }),
            [with_tags(["owners"])],
        );

        let mut pets = owners.group("/:ownerId/pets/");
        pets.get(
            "/",
            handler(|_req| async { paginated(Vec::<String>::new(), 0, 1, 20) }),
            [with_query_parameter("page", "integer", "Page number", false)],
        );
    }

    app
}

#[test]
fn test_document_describes_every_route() {
    let app = build_app();
    let doc = app.setup().document();

    assert_eq!(doc.info.title, "Pet Store");
    assert_eq!(doc.base_path, "/api");
    assert_eq!(doc.schemes, vec!["https"]);

    let paths: Vec<_> = doc.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/owners/{ownerId}", "/owners/{ownerId}/pets/", "/pets"]);

    let create = doc.operation("/pets", "post").unwrap();
    assert_eq!(create.summary, "Create a pet");
    assert_eq!(create.responses.keys().collect::<Vec<_>>(), vec!["200", "201", "400"]);
    let body = create.parameters[0].schema.as_ref().unwrap();
    assert_eq!(body.required, vec!["name", "age"]);

    let owner = doc.operation("/owners/{ownerId}", "get").unwrap();
    assert_eq!(owner.parameters[0].name, "ownerId");
    assert_eq!(owner.parameters[0].param_type.as_deref(), Some("string"));
    assert_eq!(owner.summary, "API endpoint");

    let list = doc.operation("/owners/{ownerId}/pets/", "get").unwrap();
    assert_eq!(list.parameters.len(), 1);
    assert_eq!(list.parameters[0].name, "page");
    assert_eq!(list.tags, vec!["default"]);
}

#[test]
fn test_served_document_is_stable() {
    let app = build_app();
    let first = app.setup().json_response().unwrap();
    let second = app.setup().json_response().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.headers["Content-Type"], "application/json");

    let body: Value = first.json().unwrap();
    assert_eq!(body["swagger"], "2.0");
    assert_eq!(body["info"]["contact"]["name"], "API Support");
    assert!(app.docs_routes().contains(&DOCUMENT_PATH));
}

fn find(app: &App, method: HttpMethod, path: &str) -> HandlerFn {
    app.routes()
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map(|r| r.handler.clone())
        .expect("route registered")
}

#[tokio::test]
async fn test_create_pet_resolves_shared_store() {
    let app = build_app();
    let create = find(&app, HttpMethod::POST, "/pets");

    for expected in 1..=2 {
        let req = RequestContext::new(HttpMethod::POST, "/pets").with_body(r#"{"name": "Rex", "age": 3}"#);
        let resp = create(req).await.unwrap();
        assert_eq!(resp.status, 201);
        let body: ApiResponse = resp.json().unwrap();
        assert!(body.success);
        assert_eq!(body.data.unwrap()["id"], expected);
    }
}

#[tokio::test]
async fn test_invalid_pet_is_rejected_with_field_errors() {
    let app = build_app();
    let create = find(&app, HttpMethod::POST, "/pets");

    let req = RequestContext::new(HttpMethod::POST, "/pets").with_body(r#"{"name": "", "age": 99}"#);
    let resp = create(req).await.unwrap();
    assert_eq!(resp.status, 400);

    let body: Value = resp.json().unwrap();
    assert_eq!(body["type"], "validation_error");
    let fields: Vec<_> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["age", "name"]);

    let malformed = RequestContext::new(HttpMethod::POST, "/pets").with_body("{");
    let resp = create(malformed).await.unwrap();
    assert_eq!(resp.status, 400);
    let body: ErrorResponse = resp.json().unwrap();
    assert_eq!(body.error_type.as_deref(), Some("bad_request"));
}

#[test]
fn test_grouped_handler_sees_path_params() {
    let app = build_app();
    let get_owner = find(&app, HttpMethod::GET, "/owners/:ownerId");

    tokio_test::block_on(async {
        let resp = get_owner(RequestContext::new(HttpMethod::GET, "/owners/7").with_param("ownerId", "7"))
            .await
            .unwrap();
        let body: ApiResponse = resp.json().unwrap();
        assert_eq!(body.data, Some(json!({"id": "7"})));

        let err = get_owner(RequestContext::new(HttpMethod::GET, "/owners/"))
            .await
            .unwrap_err();
        assert_eq!(err.to_response().status, 404);
    });
}

#[test]
fn test_unregistered_dependency_maps_to_internal_error() {
    #[derive(Debug)]
    struct Mailer;
    let app = App::new(ApiConfig::default());
    let ctx = RequestContext::new(HttpMethod::GET, "/");

    let err = app.container().resolve::<Mailer>(&ctx).unwrap_err();
    assert!(matches!(err, Error::ProviderNotFound(_)));
    let resp = err.to_response();
    assert_eq!(resp.status, 500);
    let body: ErrorResponse = resp.json().unwrap();
    assert_eq!(body.detail, json!("internal server error"));
}

#[test]
fn test_transient_dependency_runs_per_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let app = App::new(ApiConfig::default());
    app.register_dependency(move |ctx: &RequestContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(ctx.path.clone())
    });

    let ctx = RequestContext::new(HttpMethod::GET, "/whoami");
    assert_eq!(*app.container().resolve::<String>(&ctx).unwrap(), "/whoami");
    assert_eq!(*app.container().resolve::<String>(&ctx).unwrap(), "/whoami");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_config_layers_feed_the_document() {
    let config = ConfigBuilder::new()
        .vars([("KEEL_TITLE", "Layered"), ("KEEL_HOST", "layered.local")])
        .build()
        .unwrap();
    let app = App::new(config);

    let doc = app.setup().document();
    assert_eq!(doc.info.title, "Layered");
    assert_eq!(doc.host, "layered.local");
    assert!(doc.paths.is_empty());
}
