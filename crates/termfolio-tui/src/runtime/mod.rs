//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! `UiEffect::Dispatch` resolves the command on tokio's blocking pool and
//! sends `UiEvent::CommandResolved` to `inbox_tx`. The loop drains
//! `inbox_rx` every iteration, so the session stays in its dispatching
//! phase until the result is applied.
//!
//! ## Reveal cadence
//!
//! A [`RevealClock`] runs while the session has a line mid-reveal. Each
//! iteration turns the elapsed time into a `UiEvent::RevealDue` so the
//! typing speed does not depend on the frame rate.

mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use termfolio_core::commands::{CommandRegistry, CommandResult, Dispatcher};
use termfolio_core::config::Config;
use termfolio_core::content::{ContentProvider, Portfolio};
use termfolio_core::session::{Session, SessionOptions};
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, info, warn};

use crate::clock::RevealClock;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::theme::Theme;
use crate::{render, terminal, update};

/// Frame cadence while something is moving (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop and on UI-thread panics.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    config: Config,
    dispatcher: Arc<Dispatcher>,
    clock: RevealClock,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and takes over the terminal.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn new(config: Config, portfolio: Portfolio) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let dispatcher = Arc::new(build_dispatcher(portfolio));
        let state = AppState::new(
            new_session(&config, dispatcher.content()),
            Theme::from_name(config.theme),
        );
        let clock = RevealClock::new(config.typing_interval());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            config,
            dispatcher,
            clock,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let result = self.event_loop();

        let _ = terminal::disable_input_features();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Layout-dependent handling sees the current size first.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                if !matches!(&event, UiEvent::Frame { .. }) {
                    dirty = true;
                }

                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            self.sync_clock();

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Keeps the reveal clock running exactly while a line is mid-reveal.
    fn sync_clock(&mut self) {
        if self.state.session.active_line().is_some() {
            self.clock.start(Instant::now());
        } else {
            self.clock.stop();
        }
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from all sources (inbox, reveal clock, terminal).
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if self.state.session.is_busy() || recent_terminal_activity {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        self.collect_inbox_events(&mut events);

        if let Some(budget) = self.clock.due(Instant::now()) {
            events.push(UiEvent::RevealDue(budget));
        }

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());

        // Don't block when there is already work to render.
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Dispatch { input } => {
                debug!(%input, "dispatching command");
                let dispatcher = Arc::clone(&self.dispatcher);
                let history = self.state.session.history().to_vec();
                self.spawn_effect(move || resolve_command(dispatcher, input, history));
            }
            UiEffect::Reload => self.reload(),
        }
    }

    /// Re-reads the content file and starts a fresh session.
    ///
    /// A content file that fails to load keeps the previous content.
    fn reload(&mut self) {
        let (dispatcher, session) = reload_content(&self.config, &self.dispatcher);
        self.dispatcher = dispatcher;
        self.state.session = session;
        self.state.follow_bottom();
        self.clock.stop();
        info!("session reloaded");
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

fn build_dispatcher(portfolio: Portfolio) -> Dispatcher {
    Dispatcher::new(CommandRegistry::builtin(), Arc::new(portfolio))
}

fn new_session(config: &Config, content: &dyn ContentProvider) -> Session {
    Session::new(SessionOptions::from_config(config, content))
}

/// Reloads the configured content and starts a fresh session on it.
///
/// Content that fails to load leaves `current` in place.
fn reload_content(config: &Config, current: &Arc<Dispatcher>) -> (Arc<Dispatcher>, Session) {
    let dispatcher = match Portfolio::load(config.content_path().as_deref()) {
        Ok(portfolio) => Arc::new(build_dispatcher(portfolio)),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "keeping previous content");
            Arc::clone(current)
        }
    };
    let session = new_session(config, dispatcher.content());
    (dispatcher, session)
}

/// Resolves one command on the blocking pool.
async fn resolve_command(
    dispatcher: Arc<Dispatcher>,
    input: String,
    history: Vec<String>,
) -> UiEvent {
    let command = input.clone();
    let result = task::spawn_blocking(move || dispatcher.resolve(&input, &history))
        .await
        .unwrap_or_else(|err| {
            warn!(%command, error = %err, "dispatch task failed");
            CommandResult::error(format!("{command}: {err}"))
        });
    UiEvent::CommandResolved { result }
}
