use http::StatusCode;

/// Error payload of a response with a status code of 400 or more.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiError {
    code: u16,
    message: String,
    violations: Vec<ErrorViolation>,
}

impl ApiError {
    /// Builds the error of a status, with its canonical reason phrase as message.
    pub fn new(status: StatusCode, violations: Vec<ErrorViolation>) -> Self {
        Self {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
            violations,
        }
    }

    /// The response status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The reason phrase of the status.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The violations reported by the server.
    pub fn violations(&self) -> &[ErrorViolation] {
        &self.violations
    }
}

/// A violation reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorViolation {
    #[serde(alias = "property_path")]
    property_path: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorViolation {
    /// Creates a violation without code.
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Sets the machine-readable code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The path of the offending property.
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The machine-readable code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_is_reason_phrase() {
        let error = ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            vec![ErrorViolation::new("name", "This value should not be blank.").with_code("c1051bb4")],
        );

        insta::assert_json_snapshot!(error, @r#"
        {
          "code": 422,
          "message": "Unprocessable Entity",
          "violations": [
            {
              "propertyPath": "name",
              "message": "This value should not be blank.",
              "code": "c1051bb4"
            }
          ]
        }
        "#);
    }
}
