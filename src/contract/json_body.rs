use std::sync::Arc;

use crate::config::ContractConfig;
use crate::error::ContractError;
use crate::logging::ContractLog;
use crate::request::Request;
use crate::response::Response;

use super::{rejection, Handler};

/// Parses the request body as a JSON object with the given properties.
///
/// On success the object is stored on the request, see [`Request::json`].
///
/// # Errors
///
/// - `ContractError::InvalidJsonBody` if the body is not JSON or not an object
/// - `ContractError::MissingJsonProperty` for the first absent property
///
/// # Examples
///
/// ```
/// use api_contract::{validate_json_body, Method, Request};
///
/// let mut request = Request::new("req-1", Method::Post, "/events");
/// request.set_body(r#"{"name": "launch", "date": "2024-05-01"}"#);
///
/// validate_json_body(&["name", "date"], &mut request).unwrap();
/// assert_eq!(request.json().unwrap()["name"], "launch");
/// ```
pub fn validate_json_body<S: AsRef<str>>(
    required: &[S],
    request: &mut Request,
) -> Result<(), ContractError> {
    let parsed: serde_json::Value = serde_json::from_slice(request.body())
        .map_err(|e| ContractError::InvalidJsonBody(e.to_string()))?;

    let serde_json::Value::Object(object) = parsed else {
        return Err(ContractError::InvalidJsonBody(
            "expected a JSON object".to_string(),
        ));
    };

    if let Some(missing) = required
        .iter()
        .map(|name| name.as_ref())
        .find(|name| !object.contains_key(*name))
    {
        return Err(ContractError::MissingJsonProperty(missing.to_string()));
    }

    request.set_json(object);
    Ok(())
}

/// Handler wrapper that requires a JSON object body.
///
/// # Examples
///
/// ```
/// use api_contract::{ContractConfig, Handler, JsonBody, Method, Request, Response};
/// use serde_json::json;
///
/// let handler = JsonBody::new(["name"], ContractConfig::debug(), |request: Request| {
///     let name = request.json().and_then(|body| body.get("name")).cloned();
///     Response::created(json!({"name": name}))
/// });
///
/// let mut request = Request::new("req-1", Method::Post, "/users");
/// request.set_body(r#"{"name": "alice"}"#);
/// assert_eq!(handler.call(request).status(), 201);
///
/// let mut request = Request::new("req-2", Method::Post, "/users");
/// request.set_body(r#"{"nickname": "al"}"#);
/// assert_eq!(handler.call(request).status(), 400);
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<H> {
    required: Arc<[String]>,
    config: ContractConfig,
    handler: H,
}

impl<H: Handler> JsonBody<H> {
    /// Wraps `handler`, requiring each name in `required` as a top-level
    /// property of the body.
    pub fn new<I, S>(required: I, config: ContractConfig, handler: H) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            config,
            handler,
        }
    }

    /// Returns the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.handler
    }
}

impl<H: Handler> Handler for JsonBody<H> {
    fn call(&self, mut request: Request) -> Response {
        if self.config.mode().is_bypassed() {
            return self.handler.call(request);
        }

        let log = ContractLog::for_request(&request);

        match validate_json_body(&*self.required, &mut request) {
            Ok(()) => {
                log.debug(format_args!("json body validated"));
                self.handler.call(request)
            }
            Err(error) if self.config.mode().rejects() => {
                log.rejected(&error);
                rejection(&error, &self.config)
            }
            Err(error) => {
                log.observed(&error);
                self.handler.call(request)
            }
        }
    }
}
