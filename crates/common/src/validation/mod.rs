// Validation Module - endpoint and credential field checks
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CommonError;

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

static IPV4_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").ok());

static DOMAIN_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]+\.[a-zA-Z]{2,}$").ok());

/// Validation error with field-level details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Create an empty error collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    /// Whether any field failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors recorded for `field`
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Convert into `Ok(())` when no error was recorded
    pub fn into_result(self) -> ValidationResult<()> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> =
            self.errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CommonError {
    fn from(err: ValidationError) -> Self {
        match err.errors.first() {
            Some(first) if err.errors.len() == 1 => {
                CommonError::validation(first.field.clone(), first.message.clone())
            }
            _ => CommonError::validation("multiple", err.to_string()),
        }
    }
}

/// Check that a TCP port is in `1..=65535`
///
/// Ports arrive as `i64` because settings stores hand back loosely typed
/// integers (or strings parsed into integers).
pub fn validate_port(port: i64) -> ValidationResult<u16> {
    if (1..=65_535).contains(&port) {
        u16::try_from(port).map_err(|_| ValidationError::field("port", "port out of range"))
    } else {
        Err(ValidationError::field("port", format!("port must be between 1 and 65535, got {port}")))
    }
}

/// Advisory check for a bare server address
///
/// Accepts a dotted IPv4 literal or a `label.tld` style domain name. The
/// endpoint resolver does not require this to hold; settings forms use it to
/// warn early.
pub fn is_valid_address(address: &str) -> bool {
    let matches = |pattern: &Lazy<Option<Regex>>| {
        pattern.as_ref().map(|re| re.is_match(address)).unwrap_or(false)
    };
    matches(&IPV4_PATTERN) || matches(&DOMAIN_PATTERN)
}

/// Reject empty or whitespace-only values
pub fn validate_non_empty(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::field(field, format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}
