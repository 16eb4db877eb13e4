use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

use crate::{FetchError, Payload, RequestOptions};

/// Something that can carry out a request.
///
/// Implementations should stop work and return [`FetchError::Cancelled`]
/// once `cancel` fires, but the controller does not rely on it: results of
/// superseded operations are discarded either way.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn issue(
        &self,
        url: &str,
        options: &RequestOptions,
        cancel: CancellationToken,
    ) -> Result<Response, FetchError>;
}

/// A fully read response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    /// Keys are lower-cased header names. Repeated headers are joined with
    /// `, `; values that are not UTF-8 are decoded lossily.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or_default()
    }
}

/// Turn a successful response into a payload.
///
/// JSON when the content type says so, plain text otherwise.
pub fn decode(response: &Response) -> Result<Payload, FetchError> {
    if response.content_type().contains("application/json") {
        let value = serde_json::from_slice(&response.body)?;
        Ok(Payload::Json(value))
    } else {
        let text = String::from_utf8(response.body.clone())
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Payload::Text(text))
    }
}
