//! Declarative request/response contracts for web handlers.
//!
//! A contract wraps a handler with a [`Schema`] describing:
//! - **Accepts**: the query/form parameters the handler takes, each bound to a
//!   [`Field`] that validates it and coerces it to a native [`Value`]
//! - **Returns**: the HTTP status codes the handler is permitted to return
//!
//! At call time the parameters are cleaned and written back into the
//! [`Request`], the handler runs, and its status code is checked. Any
//! violation is replaced by a uniform 400 Bad Request. In
//! [`Mode::Production`] the contract is a passthrough.
//!
//! # Core Types
//!
//! - [`Schema`]: Builder for accepted parameters and permitted status codes
//! - [`Field`]: Validator turning a raw parameter into a [`Value`]
//! - [`ModelStore`]: Record lookup for model-backed parameters
//! - [`Contract`]: A schema and [`ContractConfig`], ready to wrap handlers
//! - [`Handler`]: Anything that turns a [`Request`] into a [`Response`]
//!
//! # Examples
//!
//! ```
//! use api_contract::{Contract, ContractConfig, Handler, IntegerField, Method, Request, Response, Schema, Value};
//! use serde_json::json;
//!
//! let contract = Contract::new(
//!     Schema::new()
//!         .accept("x", IntegerField::new().min_value(0))
//!         .accept("y", IntegerField::new().min_value(0))
//!         .returns(200, "Operation successful")
//!         .returns(403, "User does not have permission"),
//!     ContractConfig::debug(),
//! );
//!
//! let add = contract.api(|request: Request| {
//!     let x = request.query().get("x").and_then(Value::as_i64).unwrap_or_default();
//!     let y = request.query().get("y").and_then(Value::as_i64).unwrap_or_default();
//!     Response::ok(json!({"sum": x + y}))
//! });
//!
//! let mut request = Request::new("req-123", Method::Get, "/add");
//! request.add_query_param("x", "2");
//! request.add_query_param("y", "3");
//!
//! let response = add.call(request);
//! assert_eq!(response.json_body().unwrap(), json!({"sum": 5}));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod contract;
mod error;
mod field;
mod logging;
pub mod model;
mod request;
mod response;
mod schema;
mod value;

#[cfg(test)]
mod test_utils;

pub use config::{ContractConfig, Mode};
pub use contract::{
    rejection, validate_accepts, validate_json_body, validate_returns, Accepts, Api, Contract,
    Handler, JsonBody, Returns,
};
pub use error::{ContractError, FieldErrors};
pub use field::{
    BooleanField, CharField, ChoiceField, Field, FloatField, IntegerField, ValidationError,
    ValidationErrorKind,
};
pub use model::{MemoryStore, ModelStore};
pub use request::{Method, Params, Request};
pub use response::{Response, JSON_CONTENT_TYPE};
pub use schema::{Accept, Schema};
pub use value::{Record, Value};
