//! Remote backend module
//!
//! Optional HTTP backend for query generation and SQL help. When it is not
//! configured, the local rule table answers instead.

pub mod client;
pub mod types;

pub use client::RemoteClient;
pub use types::{RemoteConfig, RemoteError};
