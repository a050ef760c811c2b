use crate::model::{ApiError, Resource};
use crate::serializer::Decoded;
use crate::transport::Response;

/// Successful outcome of a call.
#[derive(Debug)]
pub enum CallOutput {
    /// The response has no body to decode.
    Empty,
    /// A decoded resource.
    Resource(Resource),
    /// A decoded error, for statuses of 400 or more.
    Error(ApiError),
    /// The raw response, when the service returns responses.
    Response(Response),
}

impl CallOutput {
    /// Whether the response had nothing to decode.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The decoded resource, if any.
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Consumes the output, returning the decoded resource.
    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// The decoded API error, if any.
    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// The raw response, if it was returned as is.
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }

    /// Consumes the output, returning the raw response.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }
}

impl From<Decoded> for CallOutput {
    fn from(value: Decoded) -> Self {
        match value {
            Decoded::Resource(resource) => Self::Resource(resource),
            Decoded::Error(error) => Self::Error(error),
        }
    }
}
