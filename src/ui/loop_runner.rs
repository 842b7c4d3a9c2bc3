//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background fetch results, termination signals
//! and a spinner tick.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::{Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press.
pub enum Action {
    Continue,
    Quit,
}

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = 10;

const TICK: Duration = Duration::from_millis(250);

/// SIGTERM and SIGINT. Off Unix nothing is watched and `recv` never resolves.
struct ShutdownSignals {
    #[cfg(unix)]
    term: Signal,
    #[cfg(unix)]
    int: Signal,
}

impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            term: signal(SignalKind::terminate())?,
            #[cfg(unix)]
            int: signal(SignalKind::interrupt())?,
        })
    }

    /// Name of the first signal received.
    async fn recv(&mut self) -> &'static str {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.term.recv() => "SIGTERM",
                _ = self.int.recv() => "SIGINT",
            }
        }
        #[cfg(not(unix))]
        {
            std::future::pending().await
        }
    }
}

/// Runs the TUI until the user quits or a termination signal arrives.
///
/// A panic hook restores the terminal before the default hook prints, so a
/// panic never leaves the shell in raw mode.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut signals = ShutdownSignals::install()?;
    let mut terminal = setup_terminal()?;
    let mut terminal_events = crossterm::event::EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    loop {
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Results that finished while we were busy go first.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
            app.needs_redraw = true;
        }

        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            biased;

            name = signals.recv() => {
                tracing::info!(signal = name, "Shutting down on signal");
                break;
            }

            next = terminal_events.next() => match next {
                Some(Ok(Event::Key(key))) => {
                    if let Action::Quit = on_key(app, key, &event_tx) {
                        break;
                    }
                }
                Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Terminal event stream failed");
                    break;
                }
                None => break,
            },

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
                app.needs_redraw = true;
            }

            _ = tick.tick() => on_tick(app),
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn on_key(app: &mut App, key: KeyEvent, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    // Terminals that report releases would otherwise act twice per press.
    if key.kind == KeyEventKind::Release {
        return Action::Continue;
    }
    app.needs_redraw = true;
    handle_input(app, key.code, key.modifiers, event_tx)
}

/// Advance the spinner while anything is loading.
fn on_tick(app: &mut App) {
    if app.is_loading() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
