//! Request validation for invoice records.
//!
//! Runs before the pipeline so bad input is rejected at the boundary with
//! field-level messages instead of surfacing as an opaque failure deep
//! inside the template filler.

use std::fmt;

/// A single field that failed validation.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// One-line report suitable for an error response body.
    pub fn to_report(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_report())
    }
}

/// Validate that a string is not empty after trimming.
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate that the amount is a finite, non-negative number.
pub fn validate_amount(value: f64, field: &str, errors: &mut ValidationErrors) {
    if !value.is_finite() {
        errors.add(ValidationError::new(field, "Amount must be a number"));
    } else if value < 0.0 {
        errors.add(ValidationError::new(field, "Amount must not be negative"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_whitespace() {
        let mut errors = ValidationErrors::new();
        validate_required("  \t ", "fullName", "Payee name", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_amount_accepts_zero() {
        let mut errors = ValidationErrors::new();
        validate_amount(0.0, "amount", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_amount_rejects_nan() {
        let mut errors = ValidationErrors::new();
        validate_amount(f64::NAN, "amount", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_report_joins_all_errors() {
        let mut errors = ValidationErrors::new();
        validate_required("", "bankName", "Bank name", &mut errors);
        validate_amount(-5.0, "amount", &mut errors);
        let report = errors.to_report();
        assert!(report.contains("[bankName]"));
        assert!(report.contains("[amount]"));
    }
}
