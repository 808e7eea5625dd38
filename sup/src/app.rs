//! Application shell around the core session.
//!
//! `App` owns the [`Session`] and the handles needed to carry out its
//! effects: the fetch worker's request channel, the event sender for timers,
//! and the cache. The event loop calls [`App::dispatch`] for every session
//! event; nothing else mutates the session.

use crossbeam_channel::Sender;
use sup_core::cache::Cache;
use sup_core::session::{Effect, Session, SessionEvent};
use sup_core::types::Record;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::{self, AppEvent};
use crate::gh::FetchRequest;

pub struct App {
    pub session: Session,
    fetch_tx: Sender<FetchRequest>,
    event_tx: UnboundedSender<AppEvent>,
    /// `None` in demo mode.
    cache: Option<Cache>,
}

impl App {
    pub fn new(
        session: Session,
        fetch_tx: Sender<FetchRequest>,
        event_tx: UnboundedSender<AppEvent>,
        cache: Option<Cache>,
    ) -> Self {
        Self {
            session,
            fetch_tx,
            event_tx,
            cache,
        }
    }

    /// Feeds one event to the session and performs the effects it returns.
    ///
    /// Returns `true` once the session has terminated.
    pub fn dispatch(&mut self, event: SessionEvent) -> bool {
        let effects = self.session.handle(event);
        self.apply(effects);
        self.session.is_terminated()
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::DispatchFetch => {
                    if self.fetch_tx.send(FetchRequest::Fetch).is_err() {
                        tracing::error!("fetch worker is gone");
                    }
                }
                Effect::ScheduleAnimationTick => {
                    event::schedule(
                        &self.event_tx,
                        AppEvent::AnimationTick,
                        event::ANIMATION_INTERVAL,
                    );
                }
                Effect::ScheduleSpinnerTick => {
                    event::schedule(
                        &self.event_tx,
                        AppEvent::SpinnerTick,
                        event::SPINNER_INTERVAL,
                    );
                }
                Effect::PersistCache(records) => {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.save(&records) {
                            tracing::debug!(
                                path = %cache.path().display(),
                                error = %e,
                                "cache write failed"
                            );
                        }
                    }
                }
                Effect::OpenExternally(record) => open_in_browser(&record),
                // The event loop checks `is_terminated` after every dispatch.
                Effect::Terminate => {}
            }
        }
    }

    /// Ends the session, yielding the committed record.
    pub fn into_selection(self) -> Option<Record> {
        self.session.into_selection()
    }
}

/// Platform command that opens a URL in the default browser.
fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Launches the browser without blocking the event loop. The child is reaped
/// on a detached thread; its output is discarded so it cannot scribble over
/// the TUI.
fn open_in_browser(record: &Record) {
    let url = record.url();
    let spawned = std::process::Command::new(opener())
        .arg(&url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
    match spawned {
        Ok(mut child) => {
            tracing::info!(%url, "opened in browser");
            std::thread::spawn(move || {
                let _ = child.wait();
            });
        }
        Err(e) => tracing::warn!(%url, error = %e, "failed to launch browser"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sup_core::session::KeyInput;
    use sup_core::source::demo_records;

    fn app(cache: Option<Cache>) -> (App, crossbeam_channel::Receiver<FetchRequest>) {
        let (fetch_tx, fetch_rx) = crossbeam_channel::unbounded();
        let (event_tx, _event_rx) = tokio::sync::mpsc::unbounded_channel();
        (App::new(Session::new(None), fetch_tx, event_tx, cache), fetch_rx)
    }

    #[tokio::test]
    async fn start_requests_a_fetch() {
        let (mut app, fetch_rx) = app(None);
        assert!(!app.dispatch(SessionEvent::Started));
        assert_eq!(fetch_rx.try_recv().ok(), Some(FetchRequest::Fetch));
    }

    #[tokio::test]
    async fn successful_fetch_is_cached() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = Cache::new(dir.path().join("prs.json"));
        let (mut app, _fetch_rx) = app(Some(cache.clone()));

        app.dispatch(SessionEvent::Started);
        app.dispatch(SessionEvent::FetchCompleted(Ok(demo_records())));

        assert_eq!(cache.load().map(|r| r.len()), Some(8));
    }

    #[tokio::test]
    async fn enter_terminates_with_selection() {
        let (mut app, _fetch_rx) = app(None);
        app.dispatch(SessionEvent::Started);
        app.dispatch(SessionEvent::FetchCompleted(Ok(demo_records())));
        // First key only completes the reveal animation.
        app.dispatch(SessionEvent::Key(KeyInput::Down));
        assert!(app.dispatch(SessionEvent::Key(KeyInput::Enter)));
        assert_eq!(app.into_selection().map(|r| r.number), Some(78));
    }
}
