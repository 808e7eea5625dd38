//! Interactive session state machine.
//!
//! [`Session`] owns everything the dashboard shows: the full record list, the
//! filtered view, the cursor, the filter prompt, the load lifecycle, and the
//! reveal animation. It is driven one [`SessionEvent`] at a time by the
//! binary's event loop and answers each with the [`Effect`]s the loop must
//! carry out (start a fetch, arm a timer, write the cache, open a browser,
//! exit). The session itself performs no I/O and never blocks, so every
//! transition is testable without a terminal.

use crate::error::FetchError;
use crate::filter;
use crate::types::Record;

/// Rows revealed per animation tick.
pub const REVEAL_STEP: usize = 2;

/// Braille spinner frames shown while loading or refreshing.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Where the session is in loading its data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Nothing to show yet; a fetch is (or is about to be) running.
    #[default]
    Initializing,
    /// Cached records are on screen while the first fetch runs.
    ShowingCachedWhileRefreshing,
    /// The last fetch succeeded.
    Ready,
    /// A later refresh is running behind the current records.
    RefreshInFlight,
    /// The last fetch failed. Records, if any, are left as they were.
    Failed,
}

/// Which key set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Browsing,
    FilterEditing,
}

/// Terminal-independent key input.
///
/// The binary translates raw terminal keys into these; their meaning depends
/// on the current [`InputMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Up,
    Down,
    Home,
    End,
    /// Ctrl-C: leave immediately from any state.
    Interrupt,
    /// Any key with no binding. Still completes a running animation.
    Other,
}

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The event loop is up; kick off the first fetch.
    Started,
    /// A fetch dispatched earlier has finished.
    FetchCompleted(Result<Vec<Record>, FetchError>),
    /// The reveal-animation timer fired.
    AnimationTick,
    /// The spinner timer fired.
    SpinnerTick,
    /// Periodic background refresh is due.
    RefreshRequested,
    Key(KeyInput),
}

/// Work the event loop must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the fetch gateway; deliver the result as [`SessionEvent::FetchCompleted`].
    DispatchFetch,
    /// Deliver [`SessionEvent::AnimationTick`] after the animation interval.
    ScheduleAnimationTick,
    /// Deliver [`SessionEvent::SpinnerTick`] after the spinner interval.
    ScheduleSpinnerTick,
    /// Best-effort cache write; failures are ignored.
    PersistCache(Vec<Record>),
    /// Open the record in a browser without ending the session.
    OpenExternally(Record),
    /// Stop the event loop. [`Session::selection`] holds the committed record, if any.
    Terminate,
}

/// The mutable core of the dashboard.
#[derive(Debug, Default)]
pub struct Session {
    records: Vec<Record>,
    /// Indices into `records` that pass the active filter, in order.
    visible: Vec<usize>,
    cursor: usize,
    selection: Option<Record>,
    input_mode: InputMode,
    filter_query: String,
    lifecycle: Lifecycle,
    reveal_count: usize,
    failure: Option<String>,
    spinner_frame: usize,
    spinner_running: bool,
    terminated: bool,
}

impl Session {
    /// Creates a session, seeded from the cache when it holds anything.
    ///
    /// Seeded records render immediately (no animation).
    pub fn new(cached: Option<Vec<Record>>) -> Self {
        let mut session = Self::default();
        if let Some(mut records) = cached.filter(|r| !r.is_empty()) {
            sort_by_identity(&mut records);
            session.records = records;
            session.refilter();
            session.reveal_count = session.visible.len();
        }
        session
    }

    /// All records, sorted ascending by number.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records passing the active filter, in order.
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &Record> + '_ {
        self.visible.iter().map(|&i| &self.records[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The `n`th visible record.
    pub fn visible_at(&self, n: usize) -> Option<&Record> {
        self.visible.get(n).map(|&i| &self.records[i])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The record under the cursor.
    pub fn current(&self) -> Option<&Record> {
        self.visible_at(self.cursor)
    }

    /// The record committed with Enter, once the session has terminated.
    pub fn selection(&self) -> Option<&Record> {
        self.selection.as_ref()
    }

    /// Consumes the session, yielding the committed record.
    pub fn into_selection(self) -> Option<Record> {
        self.selection
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Number of visible rows, from the top, the reveal animation has shown.
    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    /// Message from the most recent failed fetch.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// True while nothing is on screen and the first data is still coming.
    pub fn is_loading(&self) -> bool {
        self.lifecycle == Lifecycle::Initializing
    }

    /// True while a fetch runs behind records already on screen.
    pub fn is_refreshing(&self) -> bool {
        matches!(
            self.lifecycle,
            Lifecycle::ShowingCachedWhileRefreshing | Lifecycle::RefreshInFlight
        )
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn is_animating(&self) -> bool {
        self.reveal_count < self.visible.len()
    }

    /// Applies one event and returns the effects it requires.
    ///
    /// After [`Effect::Terminate`] every further event is ignored, so a fetch
    /// that finishes after the user quit changes nothing.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        if self.terminated {
            return Vec::new();
        }
        match event {
            SessionEvent::Started => self.start(),
            SessionEvent::FetchCompleted(result) => self.on_fetch_completed(result),
            SessionEvent::AnimationTick => self.on_animation_tick(),
            SessionEvent::SpinnerTick => self.on_spinner_tick(),
            SessionEvent::RefreshRequested => self.request_refresh(),
            SessionEvent::Key(key) => self.on_key(key),
        }
    }

    fn start(&mut self) -> Vec<Effect> {
        if self.lifecycle != Lifecycle::Initializing {
            return Vec::new();
        }
        if !self.records.is_empty() {
            self.lifecycle = Lifecycle::ShowingCachedWhileRefreshing;
        }
        tracing::debug!(cached = self.records.len(), "session started");
        let mut effects = vec![Effect::DispatchFetch];
        effects.extend(self.arm_spinner());
        effects
    }

    /// Starts a manual or periodic refresh unless one is already running.
    fn request_refresh(&mut self) -> Vec<Effect> {
        if !matches!(self.lifecycle, Lifecycle::Ready | Lifecycle::Failed) {
            return Vec::new();
        }
        self.failure = None;
        self.lifecycle = if self.records.is_empty() {
            Lifecycle::Initializing
        } else {
            Lifecycle::RefreshInFlight
        };
        tracing::debug!(lifecycle = ?self.lifecycle, "refresh dispatched");
        let mut effects = vec![Effect::DispatchFetch];
        effects.extend(self.arm_spinner());
        effects
    }

    fn arm_spinner(&mut self) -> Option<Effect> {
        if self.spinner_running {
            return None;
        }
        self.spinner_running = true;
        Some(Effect::ScheduleSpinnerTick)
    }

    fn on_fetch_completed(&mut self, result: Result<Vec<Record>, FetchError>) -> Vec<Effect> {
        let was_loading = self.lifecycle == Lifecycle::Initializing;
        let mut records = match result {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, shown = self.records.len(), "fetch failed");
                self.failure = Some(err.message().to_owned());
                self.lifecycle = Lifecycle::Failed;
                return Vec::new();
            }
        };

        sort_by_identity(&mut records);
        let previous_key = self
            .current()
            .map(|r| (r.owner.clone(), r.repo.clone(), r.number));

        self.records = records;
        self.refilter();

        self.cursor = previous_key
            .and_then(|(owner, repo, number)| {
                self.visible().position(|r| r.key() == (owner.as_str(), repo.as_str(), number))
            })
            .unwrap_or(self.cursor);
        self.clamp_cursor();

        self.failure = None;
        self.lifecycle = Lifecycle::Ready;
        tracing::info!(count = self.records.len(), animate = was_loading, "records replaced");

        let mut effects = vec![Effect::PersistCache(self.records.clone())];
        if was_loading {
            self.reveal_count = 0;
            if self.is_animating() {
                effects.push(Effect::ScheduleAnimationTick);
            }
        } else {
            self.reveal_count = self.visible.len();
        }
        effects
    }

    fn on_animation_tick(&mut self) -> Vec<Effect> {
        if !self.is_animating() {
            return Vec::new();
        }
        self.reveal_count = (self.reveal_count + REVEAL_STEP).min(self.visible.len());
        if self.is_animating() {
            vec![Effect::ScheduleAnimationTick]
        } else {
            Vec::new()
        }
    }

    fn on_spinner_tick(&mut self) -> Vec<Effect> {
        if self.is_loading() || self.is_refreshing() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            vec![Effect::ScheduleSpinnerTick]
        } else {
            self.spinner_running = false;
            Vec::new()
        }
    }

    fn on_key(&mut self, key: KeyInput) -> Vec<Effect> {
        let quits = match self.input_mode {
            InputMode::Browsing => {
                matches!(key, KeyInput::Interrupt | KeyInput::Esc | KeyInput::Char('q'))
            }
            InputMode::FilterEditing => key == KeyInput::Interrupt,
        };
        if quits {
            return self.terminate(None);
        }

        if self.is_animating() {
            self.reveal_count = self.visible.len();
            return Vec::new();
        }

        match self.input_mode {
            InputMode::Browsing => self.on_browsing_key(key),
            InputMode::FilterEditing => {
                self.on_filter_key(key);
                Vec::new()
            }
        }
    }

    fn on_browsing_key(&mut self, key: KeyInput) -> Vec<Effect> {
        match key {
            KeyInput::Up | KeyInput::Char('k') => self.move_up(),
            KeyInput::Down | KeyInput::Char('j') => self.move_down(),
            KeyInput::Home | KeyInput::Char('g') => self.cursor = 0,
            KeyInput::End | KeyInput::Char('G') => {
                self.cursor = self.visible.len().saturating_sub(1);
            }
            KeyInput::Char('/') => self.input_mode = InputMode::FilterEditing,
            KeyInput::Char('r') => return self.request_refresh(),
            KeyInput::Char('o') => {
                if let Some(record) = self.current() {
                    return vec![Effect::OpenExternally(record.clone())];
                }
            }
            KeyInput::Enter => {
                if let Some(record) = self.current().cloned() {
                    return self.terminate(Some(record));
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_filter_key(&mut self, key: KeyInput) {
        match key {
            KeyInput::Enter => self.input_mode = InputMode::Browsing,
            KeyInput::Esc => {
                self.input_mode = InputMode::Browsing;
                self.filter_query.clear();
                self.refilter();
                self.cursor = 0;
            }
            KeyInput::Backspace => {
                if self.filter_query.pop().is_some() {
                    self.refilter();
                    self.cursor = 0;
                }
            }
            KeyInput::Char(c) if !c.is_control() => {
                self.filter_query.push(c);
                self.refilter();
                self.cursor = 0;
            }
            _ => {}
        }
    }

    fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    fn terminate(&mut self, selection: Option<Record>) -> Vec<Effect> {
        tracing::info!(selected = ?selection.as_ref().map(Record::url), "session ending");
        self.selection = selection;
        self.terminated = true;
        vec![Effect::Terminate]
    }

    /// Recomputes the visible set from the active query. Keeps the reveal
    /// count within the new length; the cursor is the caller's concern.
    fn refilter(&mut self) {
        self.visible = filter::matching_indices(&self.records, &self.filter_query);
        self.reveal_count = self.visible.len();
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }
}

/// Stable ascending sort by PR number (oldest first).
fn sort_by_identity(records: &mut [Record]) {
    records.sort_by_key(|r| r.number);
}
