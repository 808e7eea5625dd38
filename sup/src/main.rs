//! sup — terminal dashboard for your open pull requests.
//!
//! Entry point for the `sup` binary. Wires together the command line and
//! config file (`cli`, `config`), file logging (`logging`), the terminal
//! lifecycle (`tui`), the unified event bus (`event`), the `gh` fetch worker
//! (`gh`), and the session state machine from `sup-core`.
//!
//! # Startup sequence
//!
//! 1. Parse flags, load config, start logging, and resolve the search scope.
//!    A missing organization list fails here, before the terminal changes.
//! 2. Seed the session from the cache (skipped in demo mode).
//! 3. `install_panic_hook()`, then `register_sigterm()`, then `init_tui()`.
//! 4. Spawn the input task and the fetch worker thread, then send the session
//!    its `Started` event, which dispatches the first fetch.
//!
//! # Shutdown
//!
//! The event loop only exits via `break`, so `restore_tui()` always runs. The
//! runtime is then shut down so the input task releases stdin before the exit
//! action hands the terminal to `gh pr checkout`.

mod app;
mod checkout;
mod cli;
mod config;
mod event;
mod gh;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use sup_core::cache::Cache;
use sup_core::session::{Session, SessionEvent};
use sup_core::source::{DemoSource, PrSource, SearchScope};
use sup_core::types::Record;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::App;
use crate::cli::Cli;
use crate::config::Config;
use crate::event::AppEvent;
use crate::theme::Theme;
use crate::ui::keybindings::{key_input, mouse_input};

/// How often the loop wakes to check the SIGTERM flag when idle.
const HEARTBEAT: Duration = Duration::from_millis(50);

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "startup failed");
            eprintln!("sup: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Picks the search scope.
///
/// Organizations come from `--org`/`SUP_ORG` (clap applies that
/// precedence), else from the config file.
///
/// # Errors
///
/// Fails when neither `--mine` nor any organization is given.
fn resolve_scope(cli: &Cli, config: &Config) -> anyhow::Result<SearchScope> {
    if cli.mine || cli.demo {
        return Ok(SearchScope::Involving);
    }
    let pick = |orgs: &[String]| -> Vec<String> {
        orgs.iter()
            .map(|o| o.trim().to_owned())
            .filter(|o| !o.is_empty())
            .collect()
    };
    let mut orgs = pick(&cli.orgs);
    if orgs.is_empty() {
        orgs = pick(&config.orgs);
    }
    if orgs.is_empty() {
        bail!(
            "No organizations configured. Use --mine to see your PRs, or set SUP_ORG/--org \
             (or `orgs` in {})",
            Config::path().display()
        );
    }
    Ok(SearchScope::Organizations(orgs))
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(&Config::path());
    logging::init(&logging::log_path(), config.log_level.as_deref());
    tracing::info!(demo = cli.demo, mine = cli.mine, "sup starting");

    let scope = resolve_scope(&cli, &config)?;
    let theme_name = cli
        .theme
        .as_deref()
        .or(config.theme.as_deref())
        .unwrap_or(theme::DEFAULT_THEME);
    let theme = Theme::from_name(theme_name);
    let dev_dir = cli.dev_dir.clone().or_else(|| config.dev_dir.clone());

    let cache = (!cli.demo).then(Cache::at_default_location);
    let session = Session::new(cache.as_ref().and_then(Cache::load));
    let source: Box<dyn PrSource> = if cli.demo {
        Box::new(DemoSource)
    } else {
        Box::new(gh::source::GhCli::new())
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let selection = runtime.block_on(run_tui(
        session,
        source,
        scope,
        cache,
        &theme,
        config.refresh_interval(),
    ))?;
    runtime.shutdown_timeout(Duration::from_millis(100));

    let Some(record) = selection else {
        tracing::info!("quit without selection");
        return Ok(ExitCode::SUCCESS);
    };
    if cli.demo {
        return Ok(ExitCode::SUCCESS);
    }
    match finish(&record, dev_dir.as_deref(), cli.cd) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, pr = record.number, "exit action failed");
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Runs the dashboard until the session terminates or SIGTERM arrives, and
/// returns the committed record, if any.
async fn run_tui(
    session: Session,
    source: Box<dyn PrSource>,
    scope: SearchScope,
    cache: Option<Cache>,
    theme: &Theme,
    refresh_every: Option<Duration>,
) -> anyhow::Result<Option<Record>> {
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("failed to register SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("failed to initialise terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone(), refresh_every);

    let (fetch_tx, fetch_rx) = crossbeam_channel::unbounded();
    let worker_tx = handler.tx.clone();
    std::thread::spawn(move || gh::worker::fetch_worker_loop(source, scope, fetch_rx, worker_tx));

    let mut app = App::new(session, fetch_tx, handler.tx.clone(), cache);
    let mut rx = handler.rx;
    app.dispatch(SessionEvent::Started);

    let loop_result = event_loop(&mut terminal, &mut app, &mut rx, theme, &term_flag).await;

    // Restore at the single exit point, then surface any draw error.
    tui::restore_tui().context("failed to restore terminal")?;
    loop_result.context("terminal I/O failed")?;
    Ok(app.into_selection())
}

async fn event_loop(
    terminal: &mut tui::Tui,
    app: &mut App,
    rx: &mut UnboundedReceiver<AppEvent>,
    theme: &Theme,
    term_flag: &AtomicBool,
) -> std::io::Result<()> {
    terminal.draw(|frame| ui::render(frame, &app.session, theme))?;

    'event_loop: loop {
        tokio::select! {
            // A quiet terminal would otherwise block in recv() and never see SIGTERM.
            _ = tokio::time::sleep(HEARTBEAT) => {
                if term_flag.load(Ordering::Relaxed) {
                    tracing::info!("SIGTERM received");
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let Some(app_event) = maybe_event else {
                    break 'event_loop;
                };
                // Resize needs a fresh frame; stray mouse motion does not.
                let is_resize = matches!(app_event, AppEvent::Resize(..));
                let session_event = match app_event {
                    AppEvent::Key(key) => Some(SessionEvent::Key(key_input(key))),
                    AppEvent::Mouse(mouse) => mouse_input(mouse).map(SessionEvent::Key),
                    AppEvent::Resize(_, _) => None,
                    AppEvent::AnimationTick => Some(SessionEvent::AnimationTick),
                    AppEvent::SpinnerTick => Some(SessionEvent::SpinnerTick),
                    AppEvent::RefreshTick => Some(SessionEvent::RefreshRequested),
                    AppEvent::FetchResult(result) => Some(SessionEvent::FetchCompleted(*result)),
                };
                let redraw = match session_event {
                    Some(e) => {
                        if app.dispatch(e) {
                            break 'event_loop;
                        }
                        true
                    }
                    None => is_resize,
                };
                if redraw {
                    terminal.draw(|frame| ui::render(frame, &app.session, theme))?;
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }
    Ok(())
}

/// Locates the clone and performs the chosen exit action.
fn finish(record: &Record, dev_dir: Option<&Path>, cd: bool) -> Result<(), checkout::ExitError> {
    let path = checkout::locate(record, dev_dir)?;
    if cd {
        let target = checkout::cd_path_file();
        checkout::write_cd_path(&path, &target)?;
        tracing::info!(path = %path.display(), target = %target.display(), "wrote cd path");
        Ok(())
    } else {
        checkout::checkout(record, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["sup"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn mine_ignores_orgs() {
        let scope = resolve_scope(&cli(&["--mine", "--org", "acme"]), &Config::default()).unwrap();
        assert_eq!(scope, SearchScope::Involving);
    }

    #[test]
    fn flag_orgs_beat_config() {
        let config = Config {
            orgs: vec!["from-config".into()],
            ..Config::default()
        };
        let scope = resolve_scope(&cli(&["--org", "acme, globex"]), &config).unwrap();
        assert_eq!(scope, SearchScope::Organizations(vec!["acme".into(), "globex".into()]));
    }

    #[test]
    fn config_orgs_used_when_no_flag() {
        let config = Config {
            orgs: vec!["acme".into()],
            ..Config::default()
        };
        let scope = resolve_scope(&Cli::default(), &config).unwrap();
        assert_eq!(scope, SearchScope::Organizations(vec!["acme".into()]));
    }

    #[test]
    fn no_orgs_is_an_error() {
        let err = resolve_scope(&Cli::default(), &Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("No organizations configured."));
    }
}
