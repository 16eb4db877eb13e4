pub mod use_fetch;

pub use use_fetch::{FetchHookReturn, use_fetch};
