//! Client-side data fetching with a single active request.
//!
//! [`RequestController`] issues a request for the current [`RequestParams`]
//! and exposes `{data, loading, error}` as a [`RequestState`]. Changing the
//! params or calling `refetch` cancels the in-flight request, and results of
//! superseded requests never reach the state.

pub mod controller;
pub mod error;
pub mod http;
pub mod params;
pub mod state;
pub mod transport;

pub use controller::{RequestController, SubscriptionId};
pub use error::FetchError;
pub use http::HttpTransport;
pub use params::{RequestOptions, RequestParams};
pub use state::{Payload, RequestState};
pub use transport::{Response, Transport, decode};

pub use tokio_util::sync::CancellationToken;
