//! Contract enforcement around handlers.
//!
//! A contract wraps a [`Handler`] and returns a new handler. Stages run in a
//! fixed order and stop at the first failure:
//!
//! ```text
//! Start
//!   ↓ accepts: clean declared parameters, write native values back
//! AcceptsValidated
//!   ↓ call the wrapped handler
//! HandlerInvoked
//!   ↓ returns: check the status code against the declared set
//! ReturnsValidated → Success (handler response passed through)
//!
//! any failure → Rejected (400 Bad Request)
//! ```
//!
//! In [`Mode::Production`](crate::Mode::Production) none of this runs: the
//! wrapped handler is called directly. In [`Mode::Observe`](crate::Mode::Observe)
//! failures are logged and the request carries on.
//!
//! Contracts are immutable once built, so one instance can serve concurrent
//! requests. All per-request state lives on the stack of a single call.

mod accepts;
mod api;
mod json_body;
mod returns;

use std::sync::Arc;

pub use accepts::{validate_accepts, Accepts};
pub use api::Api;
pub use json_body::{validate_json_body, JsonBody};
pub use returns::{validate_returns, Returns};

use crate::config::ContractConfig;
use crate::error::ContractError;
use crate::request::Request;
use crate::response::Response;
use crate::schema::Schema;

/// Message in the body of a rejection when errors are not exposed.
pub const GENERIC_REJECTION: &str = "bad request";

/// A request handler.
///
/// Implemented for every `Fn(Request) -> Response` closure, and by each
/// contract wrapper so that wrappers nest.
///
/// # Examples
///
/// ```
/// use api_contract::{Handler, Method, Request, Response};
/// use serde_json::json;
///
/// let handler = |request: Request| Response::ok(json!({"path": request.path()}));
///
/// let response = handler.call(Request::new("req-1", Method::Get, "/ping"));
/// assert_eq!(response.status(), 200);
/// ```
pub trait Handler: Send + Sync {
    /// Handles one request.
    fn call(&self, request: Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(Request) -> Response + Send + Sync,
{
    fn call(&self, request: Request) -> Response {
        self(request)
    }
}

/// A schema paired with its config, ready to wrap handlers.
///
/// # Examples
///
/// ```
/// use api_contract::{Contract, ContractConfig, Handler, IntegerField, Method, Request, Response, Schema};
/// use serde_json::json;
///
/// let contract = Contract::new(
///     Schema::new()
///         .accept("x", IntegerField::new().min_value(0))
///         .returns(200, "OK"),
///     ContractConfig::debug(),
/// );
///
/// let handler = contract.api(|request: Request| {
///     let x = request.query().get("x").and_then(|v| v.as_i64()).unwrap_or_default();
///     Response::ok(json!({"x": x}))
/// });
///
/// let mut request = Request::new("req-1", Method::Get, "/");
/// request.add_query_param("x", "10");
/// assert_eq!(handler.call(request).status(), 200);
///
/// let mut request = Request::new("req-2", Method::Get, "/");
/// request.add_query_param("x", "-1");
/// assert_eq!(handler.call(request).status(), 400);
/// ```
#[derive(Debug, Clone)]
pub struct Contract {
    schema: Arc<Schema>,
    config: ContractConfig,
}

impl Contract {
    /// Creates a contract from a schema and config.
    pub fn new(schema: Schema, config: ContractConfig) -> Self {
        Self {
            schema: Arc::new(schema),
            config,
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the config.
    pub fn config(&self) -> ContractConfig {
        self.config
    }

    /// Wraps `handler` with the full accepts → handler → returns pipeline.
    pub fn api<H: Handler>(&self, handler: H) -> Api<H> {
        Api::new(Arc::clone(&self.schema), self.config, handler)
    }

    /// Wraps `handler` with parameter validation only.
    pub fn accepts<H: Handler>(&self, handler: H) -> Accepts<H> {
        Accepts::new(Arc::clone(&self.schema), self.config, handler)
    }

    /// Wraps `handler` with status code validation only.
    pub fn returns<H: Handler>(&self, handler: H) -> Returns<H> {
        Returns::new(Arc::clone(&self.schema), self.config, handler)
    }
}

/// Builds the 400 response that replaces a failed request.
///
/// The body is generic unless the config exposes errors, in which case it
/// carries the failure description and any field errors.
pub fn rejection(error: &ContractError, config: &ContractConfig) -> Response {
    if config.exposes_errors() {
        Response::error(error.status(), error.to_string(), error.field_errors())
    } else {
        Response::error(error.status(), GENERIC_REJECTION, None)
    }
}
