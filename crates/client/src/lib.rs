//! HTTP client and view-state reducers for Hangover Club front ends.
//!
//! [`Client`] talks to the REST server. The [`store`] reducers hold the
//! state a UI renders; each is a pure `reduce(state, action)` function.

pub use client::Client;
pub use crate::config::ClientConfig;
pub use error::{ClientError, Result};

mod client;
pub mod config;
mod error;
pub mod store;
