use std::sync::Arc;

use crate::config::ContractConfig;
use crate::error::ContractError;
use crate::logging::ContractLog;
use crate::request::Request;
use crate::response::Response;
use crate::schema::Schema;

use super::{rejection, Handler};

/// Checks a handler's response against the schema's declared status codes.
///
/// With `require_json` set the response must also be `application/json`;
/// with `allow_server_errors` set a 500 always passes.
///
/// # Errors
///
/// - `ContractError::NonJsonResponse` if JSON is required and missing
/// - `ContractError::ReturnCodeMismatch` if the status is not declared
///
/// # Examples
///
/// ```
/// use api_contract::{validate_returns, ContractConfig, Response, Schema};
///
/// let schema = Schema::new().returns(200, "OK");
/// let config = ContractConfig::debug();
///
/// assert!(validate_returns(&schema, &config, &Response::new(200)).is_ok());
/// assert!(validate_returns(&schema, &config, &Response::new(403)).is_err());
/// ```
pub fn validate_returns(
    schema: &Schema,
    config: &ContractConfig,
    response: &Response,
) -> Result<(), ContractError> {
    if config.requires_json() && !response.is_json() {
        return Err(ContractError::NonJsonResponse {
            content_type: response.content_type().map(str::to_string),
        });
    }

    let status = response.status();
    let server_error_allowed = config.allows_server_errors() && status == 500;
    if schema.allows(status) || server_error_allowed {
        return Ok(());
    }

    let mut allowed = schema.return_codes();
    if config.allows_server_errors() && !allowed.contains(&500) {
        allowed.push(500);
    }
    Err(ContractError::ReturnCodeMismatch { status, allowed })
}

/// Handler wrapper that checks the handler's status code after it ran.
///
/// The handler's side effects have already happened when a mismatch
/// replaces its response.
///
/// Built with [`Contract::returns`](super::Contract::returns).
#[derive(Debug, Clone)]
pub struct Returns<H> {
    schema: Arc<Schema>,
    config: ContractConfig,
    handler: H,
}

impl<H: Handler> Returns<H> {
    pub(crate) fn new(schema: Arc<Schema>, config: ContractConfig, handler: H) -> Self {
        Self {
            schema,
            config,
            handler,
        }
    }

    /// Returns the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.handler
    }
}

impl<H: Handler> Handler for Returns<H> {
    fn call(&self, request: Request) -> Response {
        if self.config.mode().is_bypassed() {
            return self.handler.call(request);
        }

        let log = ContractLog::for_request(&request);
        let response = self.handler.call(request);

        match validate_returns(&self.schema, &self.config, &response) {
            Ok(()) => {
                log.debug(format_args!("returns validated ({})", response.status()));
                response
            }
            Err(error) if self.config.mode().rejects() => {
                log.rejected(&error);
                rejection(&error, &self.config)
            }
            Err(error) => {
                log.observed(&error);
                response
            }
        }
    }
}
