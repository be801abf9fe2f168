use std::fmt;

use crate::error::ContractError;
use crate::request::{Method, Request};

/// Request-scoped logger for contract decisions.
///
/// Every event carries the request ID, method and path as structured fields.
#[derive(Debug, Clone)]
pub(crate) struct ContractLog {
    request_id: String,
    method: Method,
    path: String,
}

impl ContractLog {
    /// Captures the identifying fields of `request`.
    pub(crate) fn for_request(request: &Request) -> Self {
        Self {
            request_id: request.request_id().to_string(),
            method: request.method(),
            path: request.path().to_string(),
        }
    }

    /// A failure that is being turned into a 400 response.
    pub(crate) fn rejected(&self, error: &ContractError) {
        tracing::warn!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            kind = error.kind(),
            "contract rejected request: {}",
            error
        );
    }

    /// A failure that is only being reported.
    pub(crate) fn observed(&self, error: &ContractError) {
        tracing::warn!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            kind = error.kind(),
            "contract violation ignored: {}",
            error
        );
    }

    /// A stage transition.
    pub(crate) fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            "{}",
            args
        );
    }
}
