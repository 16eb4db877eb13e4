use serde::de::DeserializeOwned;

use crate::{FetchError, RequestParams};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Convert a JSON payload into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        let value = self.as_json().ok_or_else(|| {
            FetchError::Decode("expected a JSON body, got plain text".to_string())
        })?;
        Ok(T::deserialize(value)?)
    }
}

/// Observable snapshot of a controller.
///
/// Whenever `error` is set, `data` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    pub data: Option<Payload>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl RequestState {
    /// Loading if there is something to fetch, idle otherwise.
    pub fn initial(params: &RequestParams) -> Self {
        Self {
            data: None,
            loading: params.target().is_some(),
            error: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }

    pub fn is_loaded(&self) -> bool {
        !self.loading && self.data.is_some()
    }

    pub fn is_errored(&self) -> bool {
        !self.loading && self.error.is_some()
    }
}
