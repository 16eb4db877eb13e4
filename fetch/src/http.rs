use futures::future::{Either, select};
use reqwest::Method;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::pin::pin;
use tokio_util::sync::CancellationToken;

use crate::{FetchError, RequestOptions, Response, Transport};

/// Transport backed by a `reqwest::Client`. Works natively and in the
/// browser.
#[derive(Clone, Default)]
pub struct HttpTransport {
    pub inner_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(inner_client: reqwest::Client) -> Self {
        Self { inner_client }
    }

    fn build(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<reqwest::RequestBuilder, FetchError> {
        let method = Method::from_bytes(options.method.as_bytes()).map_err(
            |_| FetchError::Transport(format!("invalid method {:?}", options.method)),
        )?;
        let mut request = self.inner_client.request(method, url);

        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        #[cfg(not(target_arch = "wasm32"))]
        let request = match options.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        #[cfg(target_arch = "wasm32")]
        let request = if options.include_credentials {
            request.fetch_credentials_include()
        } else {
            request
        };

        Ok(request)
    }
}

impl Transport for HttpTransport {
    async fn issue(
        &self,
        url: &str,
        options: &RequestOptions,
        cancel: CancellationToken,
    ) -> Result<Response, FetchError> {
        let request = self.build(url, options)?;

        let exchange = pin!(async move {
            let response = request.send().await?;
            let status = response.status();
            let status_text = status_text(&response);
            let headers = collect_headers(response.headers());
            let body = response.bytes().await?;

            Ok::<_, FetchError>(Response {
                status: status.as_u16(),
                status_text,
                headers,
                body: body.to_vec(),
            })
        });
        let cancelled = pin!(cancel.cancelled());

        // Dropping the losing exchange aborts the underlying call.
        match select(cancelled, exchange).await {
            Either::Left(((), _)) => Err(FetchError::Cancelled),
            Either::Right((result, _)) => result,
        }
    }
}

/// The reason phrase the server sent, or the canonical one for the status.
fn status_text(response: &reqwest::Response) -> String {
    // hyper only records the phrase when it differs from the canonical one.
    #[cfg(not(target_arch = "wasm32"))]
    if let Some(reason) =
        response.extensions().get::<hyper::ext::ReasonPhrase>()
    {
        return String::from_utf8_lossy(reason.as_bytes()).into_owned();
    }

    response
        .status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string()
}

/// Lower-cased names; repeated headers are joined with `, ` and values
/// that are not UTF-8 are decoded lossily.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected = BTreeMap::<String, String>::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    collected
}
