use std::fmt;

use crate::Value;

/// Error returned when a field rejects a raw parameter.
///
/// Messages describe the violated constraint. They never echo the rejected
/// input back, so they are safe to return to clients.
///
/// # Examples
///
/// ```
/// use api_contract::{ValidationError, ValidationErrorKind};
///
/// let error = ValidationError::new(ValidationErrorKind::Invalid, "Enter a whole number.");
/// assert_eq!(error.kind(), ValidationErrorKind::Invalid);
/// assert_eq!(error.to_string(), "Enter a whole number.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    kind: ValidationErrorKind,
    message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error for a required parameter that is absent or empty.
    pub fn required() -> Self {
        Self::new(ValidationErrorKind::Required, "This field is required.")
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Kind of field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required value is missing or empty.
    Required,
    /// Value cannot be converted to the field's type.
    Invalid,
    /// Value is below the field's minimum.
    MinValue,
    /// Value is above the field's maximum.
    MaxValue,
    /// Value is shorter than the field's minimum length.
    MinLength,
    /// Value is longer than the field's maximum length.
    MaxLength,
    /// Value is not one of the allowed choices.
    InvalidChoice,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Invalid => write!(f, "invalid"),
            Self::MinValue => write!(f, "min value"),
            Self::MaxValue => write!(f, "max value"),
            Self::MinLength => write!(f, "min length"),
            Self::MaxLength => write!(f, "max length"),
            Self::InvalidChoice => write!(f, "invalid choice"),
        }
    }
}

/// A validator that turns a raw request parameter into a native [`Value`].
///
/// Implementations must be `Send + Sync`: one schema is shared by every
/// request a handler serves.
///
/// # Examples
///
/// ```
/// use api_contract::{Field, Value, ValidationError, ValidationErrorKind};
///
/// struct EvenField;
///
/// impl Field for EvenField {
///     fn clean(&self, raw: &str) -> Result<Value, ValidationError> {
///         match raw.trim().parse::<i64>() {
///             Ok(n) if n % 2 == 0 => Ok(Value::Int(n)),
///             _ => Err(ValidationError::new(ValidationErrorKind::Invalid, "Enter an even number.")),
///         }
///     }
/// }
///
/// assert_eq!(EvenField.clean("4").unwrap(), Value::Int(4));
/// assert!(EvenField.clean("3").is_err());
/// ```
pub trait Field: Send + Sync {
    /// Validates a present, non-empty raw value and coerces it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the value violates the field's rules.
    fn clean(&self, raw: &str) -> Result<Value, ValidationError>;

    /// Whether the parameter must be present.
    fn is_required(&self) -> bool {
        true
    }

    /// Value used when an optional parameter is absent.
    fn initial(&self) -> Option<Value> {
        None
    }
}

/// Cleans a possibly-absent raw parameter with `field`.
///
/// Absent and blank values are treated alike: a required field fails, an
/// optional one yields its initial value (`Ok(None)` when it has none, meaning
/// the parameter is skipped).
pub(crate) fn clean_param(
    field: &dyn Field,
    raw: Option<&str>,
) -> Result<Option<Value>, ValidationError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => field.clean(raw).map(Some),
        _ if field.is_required() => Err(ValidationError::required()),
        _ => Ok(field.initial()),
    }
}

/// Presence options shared by the built-in fields.
#[derive(Debug, Clone, PartialEq)]
struct Presence {
    required: bool,
    initial: Option<Value>,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            required: true,
            initial: None,
        }
    }
}

macro_rules! presence_options {
    ($ty:ty) => {
        impl $ty {
            /// Sets whether the parameter must be present (default `true`).
            pub fn required(mut self, required: bool) -> Self {
                self.presence.required = required;
                self
            }

            /// Sets the value used when the optional parameter is absent.
            pub fn initial(mut self, value: impl Into<Value>) -> Self {
                self.presence.initial = Some(value.into());
                self
            }
        }
    };
}

macro_rules! presence_impl {
    () => {
        fn is_required(&self) -> bool {
            self.presence.required
        }

        fn initial(&self) -> Option<Value> {
            self.presence.initial.clone()
        }
    };
}

/// Integer field with optional bounds.
///
/// # Examples
///
/// ```
/// use api_contract::{Field, IntegerField, Value};
///
/// let field = IntegerField::new().min_value(0);
/// assert_eq!(field.clean(" 10 ").unwrap(), Value::Int(10));
/// assert!(field.clean("-1").is_err());
/// assert!(field.clean("ten").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerField {
    min_value: Option<i64>,
    max_value: Option<i64>,
    presence: Presence,
}

impl IntegerField {
    /// Creates an unbounded, required integer field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values below `min`.
    pub fn min_value(mut self, min: i64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Rejects values above `max`.
    pub fn max_value(mut self, max: i64) -> Self {
        self.max_value = Some(max);
        self
    }
}

presence_options!(IntegerField);

impl Field for IntegerField {
    fn clean(&self, raw: &str) -> Result<Value, ValidationError> {
        let n: i64 = raw.trim().parse().map_err(|_| {
            ValidationError::new(ValidationErrorKind::Invalid, "Enter a whole number.")
        })?;

        if let Some(min) = self.min_value {
            if n < min {
                return Err(ValidationError::new(
                    ValidationErrorKind::MinValue,
                    format!("Ensure this value is greater than or equal to {}.", min),
                ));
            }
        }
        if let Some(max) = self.max_value {
            if n > max {
                return Err(ValidationError::new(
                    ValidationErrorKind::MaxValue,
                    format!("Ensure this value is less than or equal to {}.", max),
                ));
            }
        }

        Ok(Value::Int(n))
    }

    presence_impl!();
}

/// Floating point field with optional bounds. NaN and infinities are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatField {
    min_value: Option<f64>,
    max_value: Option<f64>,
    presence: Presence,
}

impl FloatField {
    /// Creates an unbounded, required float field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values below `min`.
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Rejects values above `max`.
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }
}

presence_options!(FloatField);

impl Field for FloatField {
    fn clean(&self, raw: &str) -> Result<Value, ValidationError> {
        let n = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::Invalid, "Enter a number."))?;

        if let Some(min) = self.min_value {
            if n < min {
                return Err(ValidationError::new(
                    ValidationErrorKind::MinValue,
                    format!("Ensure this value is greater than or equal to {}.", min),
                ));
            }
        }
        if let Some(max) = self.max_value {
            if n > max {
                return Err(ValidationError::new(
                    ValidationErrorKind::MaxValue,
                    format!("Ensure this value is less than or equal to {}.", max),
                ));
            }
        }

        Ok(Value::Float(n))
    }

    presence_impl!();
}

/// Text field with length limits.
///
/// Surrounding whitespace is stripped unless disabled with [`CharField::strip`].
/// Lengths are counted in characters, not bytes.
///
/// # Examples
///
/// ```
/// use api_contract::{CharField, Field, Value};
///
/// let field = CharField::new().max_length(5);
/// assert_eq!(field.clean("  hello  ").unwrap(), Value::from("hello"));
/// assert!(field.clean("hello world").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CharField {
    min_length: Option<usize>,
    max_length: Option<usize>,
    strip: bool,
    reject_control_chars: bool,
    presence: Presence,
}

impl Default for CharField {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            strip: true,
            reject_control_chars: false,
            presence: Presence::default(),
        }
    }
}

impl CharField {
    /// Creates a required text field with no length limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values shorter than `min` characters.
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Rejects values longer than `max` characters.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets whether surrounding whitespace is stripped (default `true`).
    pub fn strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    /// Rejects values containing control characters (newlines, NUL, DEL, ...).
    pub fn no_control_chars(mut self) -> Self {
        self.reject_control_chars = true;
        self
    }
}

presence_options!(CharField);

impl Field for CharField {
    fn clean(&self, raw: &str) -> Result<Value, ValidationError> {
        let text = if self.strip { raw.trim() } else { raw };

        if self.reject_control_chars && text.chars().any(char::is_control) {
            return Err(ValidationError::new(
                ValidationErrorKind::Invalid,
                "Control characters are not allowed.",
            ));
        }

        let len = text.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return Err(ValidationError::new(
                    ValidationErrorKind::MinLength,
                    format!(
                        "Ensure this value has at least {} characters (it has {}).",
                        min, len
                    ),
                ));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(ValidationError::new(
                    ValidationErrorKind::MaxLength,
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        max, len
                    ),
                ));
            }
        }

        Ok(Value::Str(text.to_string()))
    }

    presence_impl!();
}

/// Boolean field.
///
/// Accepts `true`/`false`, `1`/`0`, `on`/`off` and `yes`/`no`, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanField {
    presence: Presence,
}

impl BooleanField {
    /// Creates a required boolean field.
    pub fn new() -> Self {
        Self::default()
    }
}

presence_options!(BooleanField);

impl Field for BooleanField {
    fn clean(&self, raw: &str) -> Result<Value, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "off" | "no" => Ok(Value::Bool(false)),
            _ => Err(ValidationError::new(
                ValidationErrorKind::Invalid,
                "Enter a valid boolean.",
            )),
        }
    }

    presence_impl!();
}

/// Text field restricted to a fixed set of choices.
///
/// # Examples
///
/// ```
/// use api_contract::{ChoiceField, Field, Value};
///
/// let field = ChoiceField::new(["asc", "desc"]);
/// assert_eq!(field.clean("desc").unwrap(), Value::from("desc"));
/// assert!(field.clean("sideways").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceField {
    choices: Vec<String>,
    presence: Presence,
}

impl ChoiceField {
    /// Creates a required field accepting exactly the given choices.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            presence: Presence::default(),
        }
    }

    /// Returns the allowed choices.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

presence_options!(ChoiceField);

impl Field for ChoiceField {
    fn clean(&self, raw: &str) -> Result<Value, ValidationError> {
        let choice = raw.trim();
        if self.choices.iter().any(|c| c == choice) {
            Ok(Value::Str(choice.to_string()))
        } else {
            Err(ValidationError::new(
                ValidationErrorKind::InvalidChoice,
                "Select a valid choice. That choice is not one of the available choices.",
            ))
        }
    }

    presence_impl!();
}
