use std::collections::BTreeMap;

use crate::field::ValidationError;

/// Field validation failures keyed by parameter name.
pub type FieldErrors = BTreeMap<String, ValidationError>;

/// Errors raised while enforcing a contract.
///
/// None of these reach the handler's caller: each one is logged and turned
/// into the same 400 response. The variants only matter to the contract's own
/// logging and to the detailed body produced with `expose_errors`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractError {
    /// A declared parameter is missing or fails its field.
    #[error("failed to validate: {}", describe(.errors))]
    ParameterValidation {
        /// One error per failing parameter
        errors: FieldErrors,
    },

    /// A model-backed parameter names a record that does not exist.
    #[error("{model} with pk={pk} does not exist")]
    LookupFailure {
        /// Model the lookup ran against
        model: String,
        /// Primary key taken from the request
        pk: i64,
    },

    /// The handler returned a status code outside the declared set.
    #[error("API returned {status} instead of acceptable values {allowed:?}")]
    ReturnCodeMismatch {
        /// Status the handler returned
        status: u16,
        /// Codes the contract accepts
        allowed: Vec<u16>,
    },

    /// The handler returned a non-JSON response while JSON is required.
    #[error("API did not return JSON (content type: {})", .content_type.as_deref().unwrap_or("none"))]
    NonJsonResponse {
        /// Content type the handler set, if any
        content_type: Option<String>,
    },

    /// The request body is not a JSON object.
    #[error("invalid request JSON: {0}")]
    InvalidJsonBody(String),

    /// The request JSON lacks a required top-level property.
    #[error("request JSON must contain property '{0}'")]
    MissingJsonProperty(String),
}

impl ContractError {
    /// Builds a [`ContractError::ParameterValidation`] for a single parameter.
    pub fn parameter(name: impl Into<String>, error: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.into(), error);
        ContractError::ParameterValidation { errors }
    }

    /// Status code sent to the client.
    ///
    /// Every failure collapses to 400 Bad Request.
    pub fn status(&self) -> u16 {
        400
    }

    /// Returns the per-parameter errors for a parameter validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ContractError::ParameterValidation { errors } => Some(errors),
            _ => None,
        }
    }

    /// Short machine-readable name of the failure, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ContractError::ParameterValidation { .. } => "parameter_validation",
            ContractError::LookupFailure { .. } => "lookup_failure",
            ContractError::ReturnCodeMismatch { .. } => "return_code_mismatch",
            ContractError::NonJsonResponse { .. } => "non_json_response",
            ContractError::InvalidJsonBody(_) => "invalid_json_body",
            ContractError::MissingJsonProperty(_) => "missing_json_property",
        }
    }
}

fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(name, error)| format!("{}: {}", name, error))
        .collect::<Vec<_>>()
        .join("; ")
}
