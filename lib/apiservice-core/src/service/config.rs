/// Call-level configuration of an [`ApiService`](crate::ApiService).
///
/// Deserializable with camelCase keys:
///
/// ```
/// # use apiservice_core::ApiServiceConfig;
/// let config: ApiServiceConfig = serde_json::from_str(
///     r#"{"baseUri": "https://api.example.org", "validateResponse": false}"#,
/// )?;
/// assert!(config.validate_request);
/// assert!(!config.validate_response);
/// assert!(!config.return_response);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiServiceConfig {
    /// Scheme and authority of the API, the path of each request comes from its operation.
    pub base_uri: String,
    /// Validates requests before sending them.
    #[serde(default = "enabled")]
    pub validate_request: bool,
    /// Validates responses before decoding them.
    #[serde(default = "enabled")]
    pub validate_response: bool,
    /// Returns the raw response instead of decoding it.
    #[serde(default)]
    pub return_response: bool,
}

fn enabled() -> bool {
    true
}

impl ApiServiceConfig {
    /// Configuration with validation enabled and decoded results.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            validate_request: true,
            validate_response: true,
            return_response: false,
        }
    }
}
