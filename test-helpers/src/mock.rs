//! Scriptable transport for driving the controller deterministically.
//!
//! Tests register an expectation per url before the request is issued and
//! complete it whenever they like through the returned [`Responder`], which
//! makes it possible to resolve requests out of order.

use fetch::{CancellationToken, FetchError, RequestOptions, Response, Transport};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::oneshot;

type Outcome = Result<Response, FetchError>;

/// A request the mock has seen.
#[derive(Clone, Debug)]
pub struct IssuedRequest {
    pub url: String,
    pub options: RequestOptions,
    pub token: CancellationToken,
}

#[derive(Default)]
struct MockState {
    expectations: HashMap<String, VecDeque<oneshot::Receiver<Outcome>>>,
    issued: Vec<IssuedRequest>,
    ignore_cancellation: bool,
}

/// Transport whose responses are supplied by the test. Clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

/// Completes one expected request.
pub struct Responder {
    url: String,
    tx: oneshot::Sender<Outcome>,
}

impl Responder {
    pub fn respond(self, response: Response) {
        if self.tx.send(Ok(response)).is_err() {
            tracing::debug!(url = %self.url, "mock response arrived after request was dropped");
        }
    }

    pub fn fail(self, error: FetchError) {
        if self.tx.send(Err(error)).is_err() {
            tracing::debug!(url = %self.url, "mock failure arrived after request was dropped");
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve requests even after their token is cancelled, like a
    /// transport that cannot abort in-flight work.
    pub fn ignoring_cancellation(self) -> Self {
        self.state.borrow_mut().ignore_cancellation = true;
        self
    }

    /// Expect one request to `url`. Expectations for the same url are
    /// consumed in registration order.
    pub fn expect(&self, url: &str) -> Responder {
        let (tx, rx) = oneshot::channel();
        self.state
            .borrow_mut()
            .expectations
            .entry(url.to_string())
            .or_default()
            .push_back(rx);
        Responder {
            url: url.to_string(),
            tx,
        }
    }

    pub fn issued(&self) -> Vec<IssuedRequest> {
        self.state.borrow().issued.clone()
    }

    pub fn issued_count(&self) -> usize {
        self.state.borrow().issued.len()
    }
}

impl Transport for MockTransport {
    async fn issue(
        &self,
        url: &str,
        options: &RequestOptions,
        cancel: CancellationToken,
    ) -> Result<Response, FetchError> {
        let (rx, ignore_cancellation) = {
            let mut state = self.state.borrow_mut();
            state.issued.push(IssuedRequest {
                url: url.to_string(),
                options: options.clone(),
                token: cancel.clone(),
            });
            let rx = state
                .expectations
                .get_mut(url)
                .and_then(VecDeque::pop_front);
            (rx, state.ignore_cancellation)
        };
        let Some(rx) = rx else {
            return Err(FetchError::Transport(format!(
                "no mock response registered for {url}"
            )));
        };

        let received = if ignore_cancellation {
            rx.await
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                received = rx => received,
            }
        };
        received.unwrap_or_else(|_| {
            Err(FetchError::Transport("mock responder dropped".to_string()))
        })
    }
}

fn response(status: u16, status_text: &str, content_type: &str, body: &[u8]) -> Response {
    Response {
        status,
        status_text: status_text.to_string(),
        headers: BTreeMap::from([(
            "content-type".to_string(),
            content_type.to_string(),
        )]),
        body: body.to_vec(),
    }
}

/// 200 with an `application/json` body.
pub fn json(value: serde_json::Value) -> Response {
    response(200, "OK", "application/json", value.to_string().as_bytes())
}

/// 200 with a `text/plain` body.
pub fn text(body: &str) -> Response {
    response(200, "OK", "text/plain", body.as_bytes())
}

/// Any status with an empty plain text body.
pub fn status(status: u16, status_text: &str) -> Response {
    response(status, status_text, "text/plain", b"")
}
