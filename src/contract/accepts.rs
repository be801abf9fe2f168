use std::sync::Arc;

use crate::config::ContractConfig;
use crate::error::{ContractError, FieldErrors};
use crate::field::{clean_param, ValidationError};
use crate::logging::ContractLog;
use crate::model::{lookup_key, parse_pk, ModelStore};
use crate::request::Request;
use crate::response::Response;
use crate::schema::{Accept, Schema};
use crate::Value;

use super::{rejection, Handler};

/// Validates the request's parameters against the schema's accepts.
///
/// Reads from the parameter source of the request's method (query for GET,
/// form for POST); other methods are left alone. Every declared parameter is
/// checked and all field errors are collected; records are looked up only
/// once every parameter is well formed. Only when everything passes are the
/// native values written back, so a failed request still carries its raw
/// parameters. An optional parameter sent blank, with no initial, becomes
/// [`Value::Null`].
///
/// # Errors
///
/// - `ContractError::ParameterValidation` if any parameter is missing or
///   invalid, including a missing, blank or malformed `<name>-id` for a model
/// - `ContractError::LookupFailure` if a model key names no record
///
/// # Examples
///
/// ```
/// use api_contract::{validate_accepts, IntegerField, Method, Request, Schema, Value};
///
/// let schema = Schema::new().accept("x", IntegerField::new().min_value(0));
///
/// let mut request = Request::new("req-1", Method::Get, "/");
/// request.add_query_param("x", "10");
/// validate_accepts(&schema, &mut request).unwrap();
/// assert_eq!(request.query().get("x"), Some(&Value::Int(10)));
///
/// let mut request = Request::new("req-2", Method::Get, "/");
/// request.add_query_param("x", "-1");
/// assert!(validate_accepts(&schema, &mut request).is_err());
/// assert_eq!(request.query().get_str("x"), Some("-1"));
/// ```
pub fn validate_accepts(schema: &Schema, request: &mut Request) -> Result<(), ContractError> {
    let Some(params) = request.params_mut() else {
        return Ok(());
    };

    let mut cleaned: Vec<(&str, Value)> = Vec::new();
    let mut lookups: Vec<(&str, &dyn ModelStore, i64)> = Vec::new();
    let mut errors = FieldErrors::new();

    for (name, rule) in schema.accepts() {
        match rule {
            Accept::Field(field) => {
                let raw = params.get(name).and_then(raw_text);
                match clean_param(field.as_ref(), raw.as_deref()) {
                    Ok(Some(value)) => cleaned.push((name, value)),
                    // Sent but blank, with no initial.
                    Ok(None) if params.contains_key(name) => cleaned.push((name, Value::Null)),
                    Ok(None) => {}
                    Err(error) => {
                        errors.insert(name.to_string(), error);
                    }
                }
            }
            Accept::Model(store) => {
                let raw = params
                    .get(&lookup_key(name))
                    .and_then(raw_text)
                    .filter(|raw| !raw.trim().is_empty());
                let Some(raw) = raw else {
                    errors.insert(name.to_string(), ValidationError::required());
                    continue;
                };
                match parse_pk(&raw) {
                    Ok(pk) => lookups.push((name, store.as_ref(), pk)),
                    Err(error) => {
                        errors.insert(name.to_string(), error);
                    }
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(ContractError::ParameterValidation { errors });
    }

    for (name, store, pk) in lookups {
        let Some(record) = store.get(pk) else {
            return Err(ContractError::LookupFailure {
                model: store.model_name().to_string(),
                pk,
            });
        };
        cleaned.push((name, Value::Record(record)));
    }

    for (name, value) in cleaned {
        params.insert(name, value);
    }
    Ok(())
}

/// Text form of a stored parameter, as a field expects it.
///
/// Values cleaned by an outer contract are rendered back to text so a nested
/// contract can clean them again.
fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Str(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Handler wrapper that validates parameters before calling the handler.
///
/// Built with [`Contract::accepts`](super::Contract::accepts).
#[derive(Debug, Clone)]
pub struct Accepts<H> {
    schema: Arc<Schema>,
    config: ContractConfig,
    handler: H,
}

impl<H: Handler> Accepts<H> {
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

impl<H: Handler> Handler for Accepts<H> {
    fn call(&self, mut request: Request) -> Response {
        if self.config.mode().is_bypassed() {
            return self.handler.call(request);
        }

        let log = ContractLog::for_request(&request);

        match validate_accepts(&self.schema, &mut request) {
            Ok(()) => {
                log.debug(format_args!("accepts validated"));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ValidationErrorKind;
    use crate::request::Method;
    use crate::{CharField, IntegerField, MemoryStore, Mode};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn get(pairs: &[(&str, &str)]) -> Request {
        let mut request = Request::new("req-accepts", Method::Get, "/test");
        for (k, v) in pairs {
            request.add_query_param(*k, *v);
        }
        request
    }

    fn xy_schema() -> Schema {
        Schema::new()
            .accept("x", IntegerField::new().min_value(0))
            .accept("y", IntegerField::new().min_value(0))
    }

    #[test]
    fn coerces_valid_parameters() {
        let mut request = get(&[("x", "5"), ("y", "7")]);

        validate_accepts(&xy_schema(), &mut request).unwrap();

        assert_eq!(request.query().get("x"), Some(&Value::Int(5)));
        assert_eq!(request.query().get("y"), Some(&Value::Int(7)));
    }

    #[test]
    fn leaves_undeclared_parameters_alone() {
        let mut request = get(&[("x", "5"), ("y", "7"), ("extra", "raw")]);

        validate_accepts(&xy_schema(), &mut request).unwrap();

        assert_eq!(request.query().get_str("extra"), Some("raw"));
    }

    #[test]
    fn collects_every_field_error() {
        let mut request = get(&[("x", "-1")]);

        let error = validate_accepts(&xy_schema(), &mut request).unwrap_err();
        let errors = error.field_errors().unwrap();

        assert_eq!(errors["x"].kind(), ValidationErrorKind::MinValue);
        assert_eq!(errors["y"].kind(), ValidationErrorKind::Required);
    }

    #[test]
    fn failure_keeps_raw_values() {
        let mut request = get(&[("x", "3"), ("y", "oops")]);

        assert!(validate_accepts(&xy_schema(), &mut request).is_err());

        assert_eq!(request.query().get_str("x"), Some("3"));
        assert_eq!(request.query().get_str("y"), Some("oops"));
    }

    #[test]
    fn post_validates_form_body() {
        let schema = Schema::new().accept("name", CharField::new().max_length(10));
        let mut request = Request::new("req-post", Method::Post, "/users");
        request.add_query_param("name", "this query value is far too long");
        request.add_form_param("name", "  alice ");

        validate_accepts(&schema, &mut request).unwrap();

        assert_eq!(request.form().get("name"), Some(&Value::from("alice")));
    }

    #[test]
    fn other_methods_pass_through() {
        let mut request = Request::new("req-put", Method::Put, "/");
        request.add_query_param("x", "-1");

        assert!(validate_accepts(&xy_schema(), &mut request).is_ok());
        assert_eq!(request.query().get_str("x"), Some("-1"));
    }

    #[test]
    fn optional_parameters_use_initial_or_skip() {
        let schema = Schema::new()
            .accept("page", IntegerField::new().required(false).initial(1i64))
            .accept("filter", CharField::new().required(false));
        let mut request = get(&[]);

        validate_accepts(&schema, &mut request).unwrap();

        assert_eq!(request.query().get("page"), Some(&Value::Int(1)));
        assert!(!request.query().contains_key("filter"));
    }

    #[test]
    fn already_cleaned_values_validate_again() {
        let schema = Schema::new().accept("x", IntegerField::new());
        let mut request = get(&[]);
        request.params_mut().unwrap().insert("x", Value::Int(12));

        validate_accepts(&schema, &mut request).unwrap();

        assert_eq!(request.query().get("x"), Some(&Value::Int(12)));
    }

    #[test]
    fn model_parameter_resolves_record() {
        let store = MemoryStore::new("Course").with(7, json!({"title": "Rust"}));
        let schema = Schema::new().accept_model("course", store);
        let mut request = get(&[("course-id", "7")]);

        validate_accepts(&schema, &mut request).unwrap();

        let record = request.query().get("course").and_then(Value::as_record).unwrap();
        assert_eq!(record.pk, 7);
        assert_eq!(record.data["title"], "Rust");
    }

    #[test]
    fn model_parameter_missing_key() {
        let schema = Schema::new().accept_model("course", MemoryStore::new("Course"));
        let mut request = get(&[("course", "7")]);

        let error = validate_accepts(&schema, &mut request).unwrap_err();

        assert_eq!(
            error.field_errors().unwrap()["course"].kind(),
            ValidationErrorKind::Required
        );
    }

    #[test]
    fn model_parameter_malformed_key() {
        let schema = Schema::new().accept_model("course", MemoryStore::new("Course"));
        let mut request = get(&[("course-id", "seven")]);

        let error = validate_accepts(&schema, &mut request).unwrap_err();

        assert_eq!(
            error.field_errors().unwrap()["course"].kind(),
            ValidationErrorKind::Invalid
        );
    }

    #[test]
    fn model_parameter_unknown_record() {
        let schema = Schema::new().accept_model("course", MemoryStore::new("Course"));
        let mut request = get(&[("course-id", "99")]);

        let error = validate_accepts(&schema, &mut request).unwrap_err();

        assert_eq!(
            error,
            ContractError::LookupFailure {
                model: "Course".to_string(),
                pk: 99,
            }
        );
    }

    #[test]
    fn field_errors_take_precedence_over_lookup_failure() {
        let schema = Schema::new()
            .accept_model("course", MemoryStore::new("Course"))
            .accept("x", IntegerField::new());
        let mut request = get(&[("course-id", "99"), ("x", "nope")]);

        let error = validate_accepts(&schema, &mut request).unwrap_err();

        assert_eq!(error.kind(), "parameter_validation");
    }

    #[test]
    fn blank_optional_parameters_become_null() {
        let schema = Schema::new()
            .accept("page", IntegerField::new().required(false))
            .accept("q", CharField::new().required(false))
            .accept("size", IntegerField::new().required(false).initial(20i64));
        let mut request = get(&[("page", ""), ("q", "   "), ("size", " ")]);

        validate_accepts(&schema, &mut request).unwrap();

        assert_eq!(request.query().get("page"), Some(&Value::Null));
        assert_eq!(request.query().get("q"), Some(&Value::Null));
        assert_eq!(request.query().get("size"), Some(&Value::Int(20)));
    }

    #[test]
    fn blank_optional_parameter_keeps_raw_value_on_failure() {
        let schema = Schema::new()
            .accept("page", IntegerField::new().required(false))
            .accept("x", IntegerField::new());
        let mut request = get(&[("page", ""), ("x", "nope")]);

        assert!(validate_accepts(&schema, &mut request).is_err());

        assert_eq!(request.query().get_str("page"), Some(""));
    }

    #[test]
    fn model_parameter_blank_key_is_required() {
        let schema = Schema::new().accept_model("course", MemoryStore::new("Course"));
        let mut request = get(&[("course-id", "  ")]);

        let error = validate_accepts(&schema, &mut request).unwrap_err();

        assert_eq!(
            error.field_errors().unwrap()["course"].kind(),
            ValidationErrorKind::Required
        );
    }

    struct CountingStore(Arc<AtomicUsize>);

    impl ModelStore for CountingStore {
        fn model_name(&self) -> &str {
            "Course"
        }

        fn get(&self, _pk: i64) -> Option<crate::Record> {
            self.0.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    #[test]
    fn records_are_not_looked_up_when_a_field_fails() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let schema = Schema::new()
            .accept_model("course", CountingStore(Arc::clone(&lookups)))
            .accept("x", IntegerField::new());

        let mut request = get(&[("course-id", "3"), ("x", "nope")]);
        assert!(validate_accepts(&schema, &mut request).is_err());
        assert_eq!(lookups.load(Ordering::SeqCst), 0);

        let mut request = get(&[("course-id", "3"), ("x", "1")]);
        let error = validate_accepts(&schema, &mut request).unwrap_err();
        assert_eq!(error.kind(), "lookup_failure");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(request.query().get_str("x"), Some("1"));
    }

    // Accepts wrapper

    fn counting_handler(calls: Arc<AtomicUsize>) -> impl Handler {
        move |_request: Request| {
            calls.fetch_add(1, Ordering::SeqCst);
            Response::ok(json!({}))
        }
    }

    #[test]
    fn wrapper_rejects_invalid_without_calling_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let accepts = Accepts::new(
            Arc::new(xy_schema()),
            ContractConfig::debug(),
            counting_handler(Arc::clone(&calls)),
        );

        let response = accepts.call(get(&[("x", "-1"), ("y", "1")]));

        assert_eq!(response.status(), 400);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn wrapper_passes_coerced_request_to_handler() {
        let seen = Arc::new(Mutex::new(None));
        let seen_by_handler = Arc::clone(&seen);
        let accepts = Accepts::new(
            Arc::new(xy_schema()),
            ContractConfig::debug(),
            move |request: Request| {
                *seen_by_handler.lock().unwrap() = request.query().get("x").cloned();
                Response::ok(json!({}))
            },
        );

        let response = accepts.call(get(&[("x", "5"), ("y", "1")]));

        assert_eq!(response.status(), 200);
        assert_eq!(*seen.lock().unwrap(), Some(Value::Int(5)));
    }

    #[test]
    fn wrapper_observe_mode_calls_handler_with_raw_request() {
        let seen = Arc::new(Mutex::new(None));
        let seen_by_handler = Arc::clone(&seen);
        let accepts = Accepts::new(
            Arc::new(xy_schema()),
            ContractConfig::debug().with_mode(Mode::Observe),
            move |request: Request| {
                *seen_by_handler.lock().unwrap() = request.query().get("x").cloned();
                Response::ok(json!({}))
            },
        );

        let response = accepts.call(get(&[("x", "-1")]));

        assert_eq!(response.status(), 200);
        assert_eq!(*seen.lock().unwrap(), Some(Value::from("-1")));
    }

    #[test]
    fn wrapper_production_mode_skips_validation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let accepts = Accepts::new(
            Arc::new(xy_schema()),
            ContractConfig::production(),
            counting_handler(Arc::clone(&calls)),
        );

        let response = accepts.call(get(&[("x", "-1")]));

        assert_eq!(response.status(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(accepts.inner().call(get(&[])).status(), 200);
    }
}
