//! The request lifecycle.
//!
//! A [`RequestController`] owns at most one active operation. Starting a new
//! one cancels the previous operation's token first, then bumps a
//! generation counter. When an operation completes it only writes to the
//! state if its generation is still the current one and the controller has
//! not been disposed, so a late completion of a superseded operation is a
//! no-op whether or not the transport honored the cancellation.
//!
//! Everything runs on one thread. The futures returned by
//! [`RequestController::refetch`] are `!Send` and meant for `spawn_local`
//! style executors or to be awaited directly.

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio_util::sync::CancellationToken;

use crate::{
    FetchError, Payload, RequestParams, RequestState, Transport, decode,
};

/// Handle returned by [`RequestController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&RequestState)>;

/// Drives fetches for one logical consumer. Cloning yields another handle to
/// the same controller.
pub struct RequestController<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for RequestController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<T> {
    transport: T,
    params: RefCell<RequestParams>,
    state: RefCell<RequestState>,
    /// Generation of the most recently started operation.
    generation: Cell<u64>,
    active: RefCell<Option<CancellationToken>>,
    disposed: Cell<bool>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_subscription: Cell<u64>,
}

/// What a started operation needs once it is polled.
struct Operation {
    generation: u64,
    url: String,
    params: RequestParams,
    token: CancellationToken,
}

impl<T: Transport + 'static> RequestController<T> {
    /// Create a controller without starting anything. The state reports
    /// `loading` if there is a target, so owners that want the request in
    /// flight should use [`Self::start`] instead.
    pub fn new(transport: T, params: RequestParams) -> Self {
        let state = RequestState::initial(&params);
        Self {
            inner: Rc::new(Inner {
                transport,
                params: RefCell::new(params),
                state: RefCell::new(state),
                generation: Cell::new(0),
                active: RefCell::new(None),
                disposed: Cell::new(false),
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Create a controller and start its first operation.
    ///
    /// The state is already loading (or idle, without a target) when this
    /// returns; the returned future issues the request and must be driven
    /// by the caller.
    pub fn start(
        transport: T,
        params: RequestParams,
    ) -> (Self, LocalBoxFuture<'static, ()>) {
        let controller = Self::new(transport, params);
        let initial = controller.refetch();
        (controller, initial)
    }

    pub fn state(&self) -> RequestState {
        self.inner.state.borrow().clone()
    }

    pub fn params(&self) -> RequestParams {
        self.inner.params.borrow().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Start a new operation with the current params.
    ///
    /// The previous operation is cancelled and the state switches to loading
    /// before this returns. The returned future issues the request and
    /// resolves once the operation completes or is superseded. Without a
    /// target, or after disposal, nothing happens.
    pub fn refetch(&self) -> LocalBoxFuture<'static, ()> {
        let Some(operation) = self.begin() else {
            return future::ready(()).boxed_local();
        };
        let inner = self.inner.clone();
        async move { inner.run(operation).await }.boxed_local()
    }

    /// Replace the params. Returns `None` when they serialize identically to
    /// the current ones, otherwise starts a new operation like
    /// [`Self::refetch`].
    pub fn set_params(
        &self,
        params: RequestParams,
    ) -> Option<LocalBoxFuture<'static, ()>> {
        if self.is_disposed() {
            return None;
        }
        {
            let mut current = self.inner.params.borrow_mut();
            if *current == params {
                return None;
            }
            tracing::debug!(url = ?params.url, "request params changed");
            *current = params;
        }
        Some(self.refetch())
    }

    /// Register an observer called after every state change.
    pub fn subscribe(
        &self,
        observer: impl Fn(&RequestState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        if !self.is_disposed() {
            self.inner
                .observers
                .borrow_mut()
                .push((id, Rc::new(observer)));
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    /// Cancel the active operation and freeze the state. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        if let Some(token) = self.inner.active.borrow_mut().take() {
            token.cancel();
        }
        self.inner.observers.borrow_mut().clear();
        tracing::debug!(
            generation = self.inner.generation.get(),
            "request controller disposed"
        );
    }

    /// Synchronous half of starting an operation.
    fn begin(&self) -> Option<Operation> {
        let inner = &self.inner;
        if inner.disposed.get() {
            return None;
        }
        let params = inner.params.borrow().clone();
        let url = params.target()?.to_string();

        inner.update(|state| {
            state.loading = true;
            state.error = None;
        });

        // Cancel before the new operation exists, so two operations never
        // both consider themselves active.
        if let Some(previous) = inner.active.borrow_mut().take() {
            tracing::debug!(
                generation = inner.generation.get(),
                "superseding active request"
            );
            previous.cancel();
        }

        let generation = inner.generation.get() + 1;
        inner.generation.set(generation);
        let token = CancellationToken::new();
        *inner.active.borrow_mut() = Some(token.clone());

        tracing::debug!(generation, %url, "starting request");
        Some(Operation {
            generation,
            url,
            params,
            token,
        })
    }
}

impl<T: Transport> Inner<T> {
    fn is_current(&self, generation: u64) -> bool {
        !self.disposed.get() && self.generation.get() == generation
    }

    async fn run(&self, operation: Operation) {
        let Operation {
            generation,
            url,
            params,
            token,
        } = operation;

        let outcome = self.execute(&url, &params, token.clone()).await;

        if !self.is_current(generation) {
            tracing::debug!(generation, %url, "discarding stale result");
            return;
        }

        match outcome {
            Ok(payload) => {
                tracing::debug!(generation, %url, "request completed");
                self.active.borrow_mut().take();
                self.update(|state| {
                    state.data = Some(payload);
                    state.error = None;
                    state.loading = false;
                });
            }
            Err(e) if e.is_cancelled() && token.is_cancelled() => {
                tracing::debug!(generation, %url, "request cancelled");
            }
            Err(e) => {
                // A transport that aborts on its own must not leave the
                // state loading forever.
                let e = if e.is_cancelled() {
                    FetchError::Transport("request aborted".to_string())
                } else {
                    e
                };
                tracing::warn!(generation, %url, error = %e, "request failed");
                self.active.borrow_mut().take();
                self.update(|state| {
                    state.data = None;
                    state.error = Some(e);
                    state.loading = false;
                });
            }
        }
    }

    async fn execute(
        &self,
        url: &str,
        params: &RequestParams,
        token: CancellationToken,
    ) -> Result<Payload, FetchError> {
        let response = self.transport.issue(url, &params.options, token).await?;
        if !response.is_success() {
            return Err(FetchError::RequestFailed {
                status: response.status,
                status_text: response.status_text,
            });
        }
        decode(&response)
    }
}

impl<T> Inner<T> {
    fn update(&self, f: impl FnOnce(&mut RequestState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut *state);
            state.clone()
        };
        // Observers may call back into the controller.
        let observers = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect::<Vec<_>>();
        for observer in observers {
            observer(&snapshot);
        }
    }
}
