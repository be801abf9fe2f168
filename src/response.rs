//! The response side of the host abstraction.

use serde_json::{json, Value as Json};

use crate::error::FieldErrors;

/// Content type set by the JSON constructors.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An HTTP response returned by a handler.
///
/// The JSON constructors follow a small convention: success helpers take any
/// JSON document as the body, error helpers wrap a message as
/// `{"error_type": <status>, "error_message": ...}`.
///
/// # Examples
///
/// ```
/// use api_contract::Response;
/// use serde_json::json;
///
/// let response = Response::ok(json!({"sum": 3}));
/// assert_eq!(response.status(), 200);
/// assert!(response.is_json());
///
/// let response = Response::forbidden("not allowed");
/// assert_eq!(response.status(), 403);
/// assert_eq!(response.json_body().unwrap()["error_message"], "not allowed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Creates a plain text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            body: body.into().into_bytes(),
        }
    }

    /// Creates a JSON response.
    ///
    /// Bodies are written compactly, without whitespace between tokens.
    pub fn json(status: u16, data: Json) -> Self {
        Self {
            status,
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            body: data.to_string().into_bytes(),
        }
    }

    /// Creates a JSON error response.
    pub fn error(status: u16, message: impl Into<String>, field_errors: Option<&FieldErrors>) -> Self {
        let mut data = json!({
            "error_type": status,
            "error_message": message.into(),
        });
        if let Some(errors) = field_errors.filter(|e| !e.is_empty()) {
            let fields: serde_json::Map<String, Json> = errors
                .iter()
                .map(|(name, error)| (name.clone(), Json::from(error.message())))
                .collect();
            data["field_errors"] = Json::Object(fields);
        }
        Self::json(status, data)
    }

    /// 200 OK with a JSON body.
    pub fn ok(data: Json) -> Self {
        Self::json(200, data)
    }

    /// 201 Created with a JSON body.
    pub fn created(data: Json) -> Self {
        Self::json(201, data)
    }

    /// 202 Accepted with a JSON body.
    pub fn accepted(data: Json) -> Self {
        Self::json(202, data)
    }

    /// 400 Bad Request with a JSON body.
    pub fn bad_request(data: Json) -> Self {
        Self::json(400, data)
    }

    /// 302 error-style response.
    pub fn see_other(message: impl Into<String>) -> Self {
        Self::error(302, message, None)
    }

    /// 401 Unauthorized.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::error(401, message, None)
    }

    /// 403 Forbidden.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::error(403, message, None)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(404, message, None)
    }

    /// 409 Conflict.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::error(409, message, None)
    }

    /// 500 Internal Server Error.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::error(500, message, None)
    }

    /// 400 for operations the endpoint does not support.
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::error(400, message, None)
    }

    /// Returns the status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the content type, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns true if the content type is `application/json`.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    }

    /// Returns the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn json_body(&self) -> Result<Json, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
