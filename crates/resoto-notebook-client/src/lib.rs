//! resoto-notebook-client: Query clients for the resoto graph search API.
//!
//! A [`Client`] issues list searches, graph searches, and CLI commands
//! against a named graph. Two transports implement it:
//! - [`NativeClient`] talks HTTP directly through `reqwest`
//! - [`SandboxedClient`] goes through the host's fetch primitive, for
//!   notebooks running inside a browser sandbox
//!
//! The transport is chosen at construction time by an explicit [`Platform`].

pub mod auth;
pub mod client;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod native;
pub mod sandboxed;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use client::{connect, Client, Platform};
pub use error::{ClientError, Result};
pub use native::NativeClient;
pub use sandboxed::{Fetch, FetchRequest, FetchResponse, SandboxedClient};
