use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::field::Field;
use crate::model::ModelStore;

/// How a declared parameter is validated.
#[derive(Clone)]
pub enum Accept {
    /// Cleaned by a field validator.
    Field(Arc<dyn Field>),
    /// Resolved from `<name>-id` against a model store.
    Model(Arc<dyn ModelStore>),
}

impl fmt::Debug for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accept::Field(field) => f
                .debug_struct("Field")
                .field("required", &field.is_required())
                .finish(),
            Accept::Model(store) => f
                .debug_struct("Model")
                .field("model", &store.model_name())
                .finish(),
        }
    }
}

/// Declarative description of what a handler accepts and returns.
///
/// Parameters are validated in the order they were declared. Declaring a name
/// twice replaces the earlier rule; declaring a status code twice replaces its
/// description.
///
/// # Examples
///
/// ```
/// use api_contract::{IntegerField, Schema};
///
/// let schema = Schema::new()
///     .accept("x", IntegerField::new().min_value(0))
///     .accept("y", IntegerField::new().min_value(0))
///     .returns(200, "Operation successful")
///     .returns(403, "User does not have permission");
///
/// assert_eq!(schema.accepts().count(), 2);
/// assert!(schema.allows(403));
/// assert!(!schema.allows(404));
/// assert_eq!(schema.description(200), Some("Operation successful"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    accepts: Vec<(String, Accept)>,
    returns: BTreeMap<u16, String>,
}

impl Schema {
    /// Creates a schema that accepts nothing and declares no status codes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter cleaned by `field`.
    pub fn accept(self, name: impl Into<String>, field: impl Field + 'static) -> Self {
        self.accept_rule(name, Accept::Field(Arc::new(field)))
    }

    /// Declares a model-backed parameter: its primary key is read from
    /// `<name>-id` and the resolved record is stored under `name`.
    pub fn accept_model(self, name: impl Into<String>, store: impl ModelStore + 'static) -> Self {
        self.accept_rule(name, Accept::Model(Arc::new(store)))
    }

    /// Declares a parameter with an already shared rule.
    pub fn accept_rule(mut self, name: impl Into<String>, rule: Accept) -> Self {
        let name = name.into();

        match self.accepts.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = rule,
            None => self.accepts.push((name, rule)),
        }

        self
    }

    /// Declares a permitted status code. The description is documentation only.
    pub fn returns(mut self, status: u16, description: impl Into<String>) -> Self {
        self.returns.insert(status, description.into());
        self
    }

    /// Iterates over declared parameters in declaration order.
    pub fn accepts(&self) -> impl Iterator<Item = (&str, &Accept)> {
        self.accepts.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Returns true if no parameters are declared.
    pub fn accepts_nothing(&self) -> bool {
        self.accepts.is_empty()
    }

    /// Returns true if `status` is a declared return code.
    pub fn allows(&self, status: u16) -> bool {
        self.returns.contains_key(&status)
    }

    /// Declared return codes in ascending order.
    pub fn return_codes(&self) -> Vec<u16> {
        self.returns.keys().copied().collect()
    }

    /// Returns the description of a declared status code.
    pub fn description(&self, status: u16) -> Option<&str> {
        self.returns.get(&status).map(String::as_str)
    }
}
