//! Structural validation of requests and responses.
//!
//! The crate does not validate messages itself: a [`MessageValidator`] checks
//! a request or a response against its [`OperationDefinition`] and reports
//! [`ConstraintViolation`]s.

use std::fmt::{self, Debug};

use crate::definition::OperationDefinition;
use crate::transport::{Request, Response};

/// A single structural-validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    property: String,
    message: String,
    constraint: String,
    location: String,
}

impl ConstraintViolation {
    /// Creates a violation.
    pub fn new(
        property: impl Into<String>,
        message: impl Into<String>,
        constraint: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
            constraint: constraint.into(),
            location: location.into(),
        }
    }

    /// The offending property.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The violated constraint.
    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    /// Where the property is, like `request.body`.
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Non-empty list of violations carried by a validation error.
///
/// Displays as a report with one block per violation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Deref)]
pub struct ConstraintViolations(#[error(not(source))] Vec<ConstraintViolation>);

impl ConstraintViolations {
    /// Wraps the violations, `None` when there is none.
    pub fn from_vec(violations: Vec<ConstraintViolation>) -> Option<Self> {
        (!violations.is_empty()).then_some(Self(violations))
    }

    /// The violations.
    pub fn into_inner(self) -> Vec<ConstraintViolation> {
        self.0
    }
}

impl fmt::Display for ConstraintViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.0 {
            writeln!(f, "[property]: {}", violation.property)?;
            writeln!(f, "[message]: {}", violation.message)?;
            writeln!(f, "[constraint]: {}", violation.constraint)?;
            writeln!(f, "[location]: {}", violation.location)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Checks messages against their operation definition.
pub trait MessageValidator: Debug + Send + Sync {
    /// Returns the violations of an outgoing request, empty when valid.
    fn validate_request(
        &self,
        request: &Request,
        definition: &OperationDefinition,
    ) -> Vec<ConstraintViolation>;

    /// Returns the violations of a received response, empty when valid.
    fn validate_response(
        &self,
        response: &Response,
        definition: &OperationDefinition,
    ) -> Vec<ConstraintViolation>;
}

/// Validator accepting every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl MessageValidator for NoopValidator {
    fn validate_request(&self, _: &Request, _: &OperationDefinition) -> Vec<ConstraintViolation> {
        vec![]
    }

    fn validate_response(&self, _: &Response, _: &OperationDefinition) -> Vec<ConstraintViolation> {
        vec![]
    }
}
