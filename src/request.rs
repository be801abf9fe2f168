//! The request side of the host abstraction.

use std::collections::HashMap;
use std::fmt;

use crate::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
        }
    }
}

/// A mutable parameter mapping.
///
/// Holds raw [`Value::Str`] entries as received and native values once a
/// contract has cleaned them.
///
/// # Examples
///
/// ```
/// use api_contract::{Params, Value};
///
/// let mut params = Params::new();
/// params.insert("x", "10");
/// assert_eq!(params.get_str("x"), Some("10"));
///
/// params.insert("x", Value::Int(10));
/// assert_eq!(params.get("x").and_then(Value::as_i64), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, Value>,
}

impl Params {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value under `key` if it is still a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Inserts or replaces the value under `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all parameters in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A single HTTP request as seen by a handler.
///
/// Framework integrations build one of these per request. The contract reads
/// and rewrites the parameter source selected by the method: the query string
/// for GET, the form body for POST.
///
/// # Examples
///
/// ```
/// use api_contract::{Method, Request};
///
/// let mut request = Request::new("req-001", Method::Get, "/add");
/// request.add_query_param("x", "10");
///
/// assert_eq!(request.params().and_then(|p| p.get_str("x")), Some("10"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    request_id: String,
    method: Method,
    path: String,
    query: Params,
    form: Params,
    args: Params,
    body: Vec<u8>,
    json: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Request {
    /// Creates a request with no parameters and an empty body.
    pub fn new(request_id: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            method,
            path: path.into(),
            query: Params::new(),
            form: Params::new(),
            args: Params::new(),
            body: Vec::new(),
            json: None,
        }
    }

    /// Adds a raw query string parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key, Value::Str(value.into()));
    }

    /// Adds a raw form body parameter.
    pub fn add_form_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.form.insert(key, Value::Str(value.into()));
    }

    /// Adds a routing argument (e.g. `id` from `/users/:id`).
    ///
    /// Arguments are handed to the handler untouched; contracts never
    /// validate them.
    pub fn add_arg(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.args.insert(key, value);
    }

    /// Replaces the raw request body.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query string parameters.
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Returns the form body parameters.
    pub fn form(&self) -> &Params {
        &self.form
    }

    /// Returns the routing arguments.
    pub fn args(&self) -> &Params {
        &self.args
    }

    /// Returns the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the parameter source for this method: query for GET, form
    /// for POST, `None` otherwise.
    pub fn params(&self) -> Option<&Params> {
        match self.method {
            Method::Get => Some(&self.query),
            Method::Post => Some(&self.form),
            _ => None,
        }
    }

    /// Mutable access to the parameter source for this method.
    pub fn params_mut(&mut self) -> Option<&mut Params> {
        match self.method {
            Method::Get => Some(&mut self.query),
            Method::Post => Some(&mut self.form),
            _ => None,
        }
    }

    /// Returns the parsed JSON body, once a JSON body contract has accepted it.
    pub fn json(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.json.as_ref()
    }

    pub(crate) fn set_json(&mut self, json: serde_json::Map<String, serde_json::Value>) {
        self.json = Some(json);
    }
}
