//! sup-core — the terminal-independent half of `sup`.
//!
//! Holds the pull-request record model, the filter engine, the cache and fetch
//! gateways, and the interactive session state machine. Nothing in this crate
//! touches the terminal; the `sup` binary drives [`session::Session`] from its
//! event loop and executes the [`session::Effect`]s it returns.

pub mod cache;
pub mod error;
pub mod filter;
pub mod paths;
pub mod session;
pub mod source;
pub mod types;
pub mod wire;

pub use error::{Error, FetchError, Result};
