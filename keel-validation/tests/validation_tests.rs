//! Integration tests for keel-validation

use keel_core::{HttpMethod, RequestContext};
use keel_validation::*;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize, Validate)]
struct CreateUser {
    #[validate(required)]
    name: Option<String>,
    #[validate(email)]
    email: String,
    #[validate(url)]
    website: String,
    #[validate(length(equal = 4))]
    pin: String,
}

#[test]
fn test_required_email_scenario() {
    let errors = format_validation_errors(&[FieldFailure::new("email", "required")]);
    assert_eq!(errors.errors[0].message, "field 'email' is required");
}

#[test]
fn test_validator_failures_reach_the_wire_shape() {
    let body = json!({
        "email": "not-an-email",
        "website": "nope",
        "pin": "12"
    });

    let err = bind_and_validate::<CreateUser>(body.to_string().as_bytes()).unwrap_err();
    let resp = err.to_response();
    assert_eq!(resp.status, 400);

    let wire: Value = resp.json().unwrap();
    assert_eq!(wire["type"], "validation_error");

    let detail = wire["detail"].as_array().unwrap();
    let fields: Vec<_> = detail.iter().map(|d| d["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["email", "name", "pin", "website"]);

    assert_eq!(detail[0]["message"], "field 'email' must be a valid email");
    assert_eq!(detail[0]["value"], "not-an-email");
    assert_eq!(detail[1]["message"], "field 'name' is required");
    assert!(detail[2]["message"]
        .as_str()
        .unwrap()
        .starts_with("field 'pin' must be exactly 4"));
    assert_eq!(detail[3]["message"], "field 'website' must be a valid URL");
}

#[test]
fn test_combined_error_message() {
    let errors = format_validation_errors(&[
        FieldFailure::new("a", "required"),
        FieldFailure::new("b", "oneof"),
    ]);
    let err: Box<dyn std::error::Error> = Box::new(errors);
    assert_eq!(
        err.to_string(),
        "field 'a' is required; field 'b' failed the 'oneof' validation"
    );
}

#[test]
fn test_query_from_request() {
    let ctx = RequestContext::new(HttpMethod::GET, "/search")
        .with_query("q", "rust")
        .with_query("limit", "abc");

    let params = [
        QueryParam::new("q", "string").required().with_description("Search text"),
        QueryParam::new("limit", "int").with_example(10i64),
        QueryParam::new("lang", "string").required(),
    ];

    let errors = parse_request_query(&ctx, &params).unwrap_err();
    let tags: Vec<_> = errors.iter().map(|e| (e.field.as_str(), e.tag.as_str())).collect();
    assert_eq!(tags, vec![("limit", "type"), ("lang", "required")]);

    let wire = serde_json::to_value(errors.to_error_response()).unwrap();
    assert_eq!(wire["detail"][0]["value"], "abc");
    assert!(wire["detail"][1].get("value").is_none());
}

#[test]
fn test_parsed_values_serialize_plainly() {
    let values = parse_query_string("n=5&x=1.5&b=false&s=hi").unwrap();
    let params = [
        QueryParam::new("n", "int64"),
        QueryParam::new("x", "float64"),
        QueryParam::new("b", "bool"),
        QueryParam::new("s", "string"),
    ];
    let parsed = parse_query_params(&values, &params).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json, json!({"n": 5, "x": 1.5, "b": false, "s": "hi"}));
}

#[test]
fn test_path_param_descriptor() {
    let param = PathParam::new("id", "int")
        .with_description("Resource ID")
        .with_example(42i64);
    assert_eq!(param.example, Some(QueryValue::Int(42)));
    assert_eq!(param.description, "Resource ID");
}

#[tokio::test]
async fn test_handler_reports_bind_failures_as_400() {
    let create = keel_core::handler(|req| async move {
        let user: CreateUser = bind_request(&req)?;
        keel_core::responses::created(json!({"name": user.name}))
    });

    let ok = RequestContext::new(HttpMethod::POST, "/users").with_body(
        r#"{"name": "Ada", "email": "ada@example.com", "website": "https://ada.dev", "pin": "1234"}"#,
    );
    assert_eq!(create(ok).await.unwrap().status, 201);

    let bad = RequestContext::new(HttpMethod::POST, "/users").with_body(
        r#"{"email": "ada@example.com", "website": "https://ada.dev", "pin": "1234"}"#,
    );
    let err = create(bad).await.unwrap_err();
    assert!(matches!(err, keel_core::Error::Validation(_)));
    assert_eq!(err.to_response().status, 400);
}
