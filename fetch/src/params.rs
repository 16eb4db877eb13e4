use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Options attached to a request, mirroring what a browser `fetch` accepts.
///
/// Headers live in a `BTreeMap` so the serialized form, and therefore
/// equality, does not depend on insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOptions {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// No timeout unless the caller asks for one.
    pub timeout: Option<Duration>,
    /// Send cookies along with cross-origin requests (browser only).
    pub include_credentials: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
            include_credentials: false,
        }
    }
}

impl RequestOptions {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Header names are stored lower-cased.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the request body and mark it as JSON.
    pub fn json_body(
        self,
        value: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(value)?;
        Ok(self.header("content-type", "application/json").body(body))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn include_credentials(mut self) -> Self {
        self.include_credentials = true;
        self
    }
}

/// What to fetch: a target url plus the options to fetch it with.
///
/// Two params are equal when their serialized forms are equal, so a freshly
/// built but identical options value never counts as a change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestParams {
    pub url: Option<String>,
    pub options: RequestOptions,
}

impl RequestParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            options: RequestOptions::default(),
        }
    }

    /// Params without a target. A controller holding these stays idle.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// The url to issue, or `None` when it is absent or blank.
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Deep-serialized form used for change detection.
    pub fn fingerprint(&self) -> String {
        // Only strings, maps, bools and durations are involved, none of which
        // can fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl PartialEq for RequestParams {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for RequestParams {}
