//! Event bus for sup.
//!
//! Terminal input, session timers, periodic refreshes, and fetch results are
//! normalised into a single `AppEvent` enum and sent over a tokio unbounded
//! MPSC channel. The main loop is the only receiver and feeds each event to
//! the session in arrival order.
//!
//! Animation and spinner ticks are one-shot: the session asks for the next
//! tick through an effect, and [`schedule`] sleeps once and sends it. A chain
//! stops as soon as the session stops asking.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use sup_core::types::Record;
use sup_core::FetchError;

/// Delay between reveal-animation steps.
pub const ANIMATION_INTERVAL: Duration = Duration::from_millis(15);

/// Delay between spinner frames.
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// All events the application can receive from any source.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    ///
    /// Release and repeat events are filtered in [`spawn_event_task`] so that
    /// Windows terminals, which report both, do not double-fire.
    Key(KeyEvent),
    /// A mouse event from the terminal (scroll wheel).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Reveal-animation step is due.
    AnimationTick,
    /// Spinner frame is due.
    SpinnerTick,
    /// Periodic background refresh is due.
    RefreshTick,
    /// Result from the fetch worker thread.
    FetchResult(Box<Result<Vec<Record>, FetchError>>),
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned for every producer; the receiver (`rx`) is
/// owned by the main event loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background tokio task that forwards terminal input.
///
/// When `refresh_every` is set, the task also emits [`AppEvent::RefreshTick`]
/// at that period; the first tick fires one full period after start-up, since
/// the initial fetch is dispatched by the session itself.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream, and
/// send errors are ignored: once the receiver is gone the process is exiting.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>, refresh_every: Option<Duration>) {
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        let mut refresh = refresh_every.map(interval_at_period);

        loop {
            let crossterm_event = reader.next().fuse();
            let refresh_tick = async {
                match refresh.as_mut() {
                    Some(i) => {
                        i.tick().await;
                    }
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                _ = refresh_tick => {
                    let _ = tx.send(AppEvent::RefreshTick);
                }
                maybe_event = crossterm_event => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if key.kind == KeyEventKind::Press {
                                let _ = tx.send(AppEvent::Key(key));
                            }
                        }
                        Some(Ok(Event::Resize(w, h))) => {
                            let _ = tx.send(AppEvent::Resize(w, h));
                        }
                        Some(Ok(Event::Mouse(mouse))) => {
                            let _ = tx.send(AppEvent::Mouse(mouse));
                        }
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "terminal input error");
                        }
                        None => break,
                        _ => {}
                    }
                }
            }
        }
    });
}

/// An interval whose first tick is one `period` away rather than immediate.
fn interval_at_period(period: Duration) -> tokio::time::Interval {
    let mut i = interval(period);
    i.reset();
    i
}

/// Sends `event` on `tx` once, after `delay`.
pub fn schedule(tx: &mpsc::UnboundedSender<AppEvent>, event: AppEvent, delay: Duration) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(event);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_REFRESH_INTERVAL;

    #[tokio::test]
    async fn longest_refresh_period_is_accepted() {
        let i = interval_at_period(MAX_REFRESH_INTERVAL);
        assert_eq!(i.period(), MAX_REFRESH_INTERVAL);
    }
}
