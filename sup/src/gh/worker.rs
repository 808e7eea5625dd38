//! Background thread that runs fetches.
//!
//! The source is moved into the thread and owned there. Requests arrive over
//! a crossbeam channel; each result goes back to the event loop as one
//! `AppEvent::FetchResult`.

use crossbeam_channel::Receiver;
use sup_core::source::{PrSource, SearchScope};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;
use crate::gh::FetchRequest;

/// Entry point for the fetch thread.
///
/// Loops until the request channel closes (sender dropped) or the event loop
/// has gone away.
pub fn fetch_worker_loop(
    source: Box<dyn PrSource>,
    scope: SearchScope,
    rx: Receiver<FetchRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    for request in rx {
        match request {
            FetchRequest::Fetch => {
                let result = source.fetch(&scope);
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "fetch failed");
                }
                if event_tx.send(AppEvent::FetchResult(Box::new(result))).is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("fetch worker exiting");
}
