// Body binding with validation

use crate::errors::ValidationErrors;
use keel_core::logging::debug;
use keel_core::{HttpResponse, RequestContext};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

/// Failure to bind a request body
#[derive(Error, Debug)]
pub enum BindError {
    /// The body is not valid JSON for the target type
    #[error("error binding data: {0}")]
    Malformed(String),

    /// The body decoded but broke one or more constraints
    #[error("{0}")]
    Invalid(ValidationErrors),
}

impl BindError {
    /// 400 response: the `{detail, type}` envelope for malformed bodies,
    /// the validation error shape otherwise
    pub fn to_response(&self) -> HttpResponse {
        match self {
            BindError::Malformed(message) => keel_core::Error::BadRequest(message.clone()).to_response(),
            BindError::Invalid(errors) => errors.to_response(),
        }
    }
}

impl From<BindError> for keel_core::Error {
    fn from(err: BindError) -> Self {
        match err {
            BindError::Malformed(message) => keel_core::Error::BadRequest(message),
            BindError::Invalid(errors) => errors.into(),
        }
    }
}

/// Decode `body` as JSON into `T` and run its validation rules
pub fn bind_and_validate<T>(body: &[u8]) -> Result<T, BindError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| BindError::Malformed(e.to_string()))?;
    validate(&value)?;
    Ok(value)
}

/// [`bind_and_validate`] over the body of a request
pub fn bind_request<T>(ctx: &RequestContext) -> Result<T, BindError>
where
    T: DeserializeOwned + Validate,
{
    bind_and_validate(&ctx.body)
}

/// Run the validation rules of an already-built value
pub fn validate<T: Validate>(value: &T) -> Result<(), BindError> {
    value.validate().map_err(|errors| {
        let errors = ValidationErrors::from(&errors);
        debug!(failures = errors.len(), "Request body failed validation");
        BindError::Invalid(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 3, max = 20))]
        username: String,
        #[validate(range(min = 18, max = 130))]
        age: u32,
    }

    #[test]
    fn test_valid_body() {
        let body = br#"{"email": "ada@example.com", "username": "ada", "age": 36}"#;
        let signup: Signup = bind_and_validate(body).unwrap();
        assert_eq!(signup.username, "ada");
        assert_eq!(signup.age, 36);
    }

    #[test]
    fn test_malformed_body() {
        let err = bind_and_validate::<Signup>(b"{not json").unwrap_err();
        assert!(matches!(err, BindError::Malformed(_)));
        assert!(err.to_string().starts_with("error binding data:"));
        assert_eq!(err.to_response().status, 400);
    }

    #[test]
    fn test_invalid_body_is_formatted() {
        let body = br#"{"email": "nope", "username": "al", "age": 12}"#;
        let err = bind_and_validate::<Signup>(body).unwrap_err();
        let BindError::Invalid(errors) = &err else {
            panic!("expected validation failure, got {:?}", err);
        };

        let summary: Vec<_> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.tag.as_str()))
            .collect();
        assert_eq!(summary, vec![("age", "gte"), ("email", "email"), ("username", "min")]);
        assert!(errors.errors[0].message.starts_with("field 'age' must be greater than or equal to 18"));
        assert!(errors.errors[2].message.starts_with("field 'username' must have a minimum value of 3"));
        assert_eq!(errors.errors[2].value, "al");

        let core: keel_core::Error = err.into();
        assert_eq!(core.status_code(), 400);
    }

    #[test]
    fn test_bind_request() {
        let ctx = RequestContext::new(keel_core::HttpMethod::POST, "/signup")
            .with_body(r#"{"email": "ada@example.com", "username": "ada", "age": 36}"#);
        assert!(bind_request::<Signup>(&ctx).is_ok());
    }
}
