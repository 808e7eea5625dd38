//! GitHub access through the `gh` CLI.
//!
//! [`source::GhCli`] implements the core fetch gateway by shelling out to
//! `gh api graphql`. The blocking call runs on a dedicated `std::thread`
//! ([`worker::fetch_worker_loop`]) so the event loop never waits on it.
pub mod source;
pub mod worker;

/// Message sent to the fetch worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    /// Run the configured query once and report the result.
    Fetch,
}
