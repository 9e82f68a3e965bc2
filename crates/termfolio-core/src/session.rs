//! Session state machine.
//!
//! Owns the transcript, the submitted history, the input buffer and the
//! in-flight status. Every mutation of those goes through a method here.
//!
//! ## Phases
//!
//! ```text
//! Idle --begin_submit--> Dispatching --finish_submit--> Revealing --ticks--> Idle
//!                                    \--clear/reload--> Idle
//! ```
//!
//! Submission is split in two so the host can resolve the command on another
//! task; [`Session::submit`] does both halves synchronously.

use tracing::{debug, warn};

use crate::commands::{CommandResult, Dispatcher, ResultContent};
use crate::config::Config;
use crate::content::ContentProvider;
use crate::line::{Line, LineId, LineKind};
use crate::reveal::{self, RevealJob};
use crate::segment::{FormattedOutput, SegmentColor, TextSegment};

/// What the session is doing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A command was accepted and its result has not arrived yet.
    Dispatching,
    /// A result is being revealed.
    Revealing(RevealJob),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Older,
    Newer,
}

/// Side effect the host must carry out after a submission completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    /// Throw the session away and build a fresh one.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub prompt: String,
    /// Name shown in the welcome banner.
    pub owner: String,
    /// Finish the running reveal instead of rejecting a new submission.
    pub interrupt_on_submit: bool,
}

impl SessionOptions {
    pub fn from_config(config: &Config, content: &dyn ContentProvider) -> Self {
        Self {
            prompt: config.prompt.clone(),
            owner: content.profile().name.clone(),
            interrupt_on_submit: config.interrupt_on_submit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    lines: Vec<Line>,
    history: Vec<String>,
    /// Offset from the most recent entry; `None` when not browsing.
    history_cursor: Option<usize>,
    pending_input: String,
    phase: Phase,
    options: SessionOptions,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            lines: welcome_lines(&options.owner),
            history: Vec::new(),
            history_cursor: None,
            pending_input: String::new(),
            phase: Phase::Idle,
            options,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Submitted commands, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history_cursor
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_dispatching(&self) -> bool {
        matches!(self.phase, Phase::Dispatching)
    }

    pub fn prompt(&self) -> &str {
        &self.options.prompt
    }

    /// Id of the line currently being revealed, if any.
    pub fn active_line(&self) -> Option<LineId> {
        match &self.phase {
            Phase::Revealing(job) => Some(job.active()),
            Phase::Idle | Phase::Dispatching => None,
        }
    }

    /// Accepts `text` for dispatch.
    ///
    /// Returns the trimmed command to resolve, or `None` when the submission
    /// was rejected (blank input or busy). On acceptance the echo line is
    /// appended, the command is recorded in history and the input is cleared.
    pub fn begin_submit(&mut self, text: &str) -> Option<String> {
        let command = text.trim();
        if command.is_empty() {
            return None;
        }

        match self.phase {
            Phase::Idle => {}
            Phase::Revealing(_) if self.options.interrupt_on_submit => {
                debug!("interrupting reveal for new submission");
                self.finish_reveal();
            }
            Phase::Revealing(_) | Phase::Dispatching => {
                debug!(command, "submission rejected while busy");
                return None;
            }
        }

        let echo = FormattedOutput::new()
            .with(TextSegment::colored(&self.options.prompt, SegmentColor::Primary).bold())
            .with(TextSegment::plain(format!(" {command}")));
        self.lines.push(Line::revealed(LineKind::CommandEcho, echo));
        self.history.push(command.to_string());
        self.history_cursor = None;
        self.pending_input.clear();
        self.phase = Phase::Dispatching;
        Some(command.to_string())
    }

    /// Applies the result of the command accepted by
    /// [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, result: CommandResult) -> SessionEffect {
        if !self.is_dispatching() {
            warn!("dropping command result that arrived outside dispatch");
            return SessionEffect::None;
        }

        match result.content {
            ResultContent::Clear => {
                self.reset_to_welcome();
                SessionEffect::None
            }
            ResultContent::Reload => {
                self.phase = Phase::Idle;
                SessionEffect::Reload
            }
            ResultContent::Output(content) => {
                let kind = if result.is_error {
                    LineKind::Error
                } else {
                    LineKind::Output
                };
                let mut parts = content.into_lines().into_iter();
                let Some(first) = parts.next() else {
                    self.phase = Phase::Idle;
                    return SessionEffect::None;
                };
                let line = Line::pending(kind, first);
                self.phase = Phase::Revealing(RevealJob::new(line.id(), kind, parts));
                self.lines.push(line);
                self.settle();
                SessionEffect::None
            }
        }
    }

    /// Submits and resolves `text` in one go.
    pub fn submit(&mut self, text: &str, dispatcher: &Dispatcher) -> SessionEffect {
        let Some(command) = self.begin_submit(text) else {
            return SessionEffect::None;
        };
        let result = dispatcher.resolve(&command, &self.history);
        self.finish_submit(result)
    }

    /// Reveals one more character of the active line.
    ///
    /// Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let Phase::Revealing(job) = &self.phase else {
            return false;
        };
        let active = job.active();
        let changed = self
            .lines
            .iter_mut()
            .rev()
            .find(|line| line.id() == active)
            .is_some_and(reveal::advance);
        self.settle();
        changed
    }

    /// Completes the active reveal and any lines queued behind it.
    ///
    /// Returns whether a reveal was running.
    pub fn finish_reveal(&mut self) -> bool {
        let Phase::Revealing(job) = &mut self.phase else {
            return false;
        };
        let active = job.active();
        if let Some(line) = self.lines.iter_mut().rev().find(|line| line.id() == active) {
            line.snap_to_complete();
        }
        self.lines.extend(job.drain_revealed());
        self.phase = Phase::Idle;
        true
    }

    /// Browses submitted commands. Returns whether anything changed.
    pub fn navigate_history(&mut self, direction: HistoryDirection) -> bool {
        if self.is_busy() {
            return false;
        }

        let next = match (direction, self.history_cursor) {
            (HistoryDirection::Older, None) => Some(0),
            (HistoryDirection::Older, Some(cursor)) => Some(cursor + 1),
            (HistoryDirection::Newer, None) => return false,
            (HistoryDirection::Newer, Some(0)) => None,
            (HistoryDirection::Newer, Some(cursor)) => Some(cursor - 1),
        };

        match next {
            Some(offset) if offset >= self.history.len() => false,
            Some(offset) => {
                self.history_cursor = Some(offset);
                self.pending_input = self.history[self.history.len() - 1 - offset].clone();
                true
            }
            None => {
                self.history_cursor = None;
                self.pending_input.clear();
                true
            }
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.pending_input.push(c);
    }

    pub fn insert_str(&mut self, text: &str) {
        self.pending_input.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.pending_input.pop();
    }

    pub fn clear_input(&mut self) {
        self.pending_input.clear();
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    fn reset_to_welcome(&mut self) {
        self.lines = welcome_lines(&self.options.owner);
        self.history.clear();
        self.history_cursor = None;
        self.phase = Phase::Idle;
    }

    /// Appends queued lines once their predecessor is complete and returns
    /// to `Idle` when nothing is left.
    fn settle(&mut self) {
        loop {
            let Phase::Revealing(job) = &mut self.phase else {
                return;
            };
            let active = job.active();
            let active_done = self
                .lines
                .iter()
                .rev()
                .find(|line| line.id() == active)
                .is_none_or(Line::is_complete);
            if !active_done {
                return;
            }
            match job.next_line() {
                Some(line) => self.lines.push(line),
                None => {
                    self.phase = Phase::Idle;
                    return;
                }
            }
        }
    }
}

/// The two-line banner a fresh or cleared session starts with.
pub fn welcome_lines(owner: &str) -> Vec<Line> {
    let greeting = FormattedOutput::new()
        .with(TextSegment::plain("Welcome to "))
        .with(TextSegment::colored(owner, SegmentColor::Accent).bold())
        .with(TextSegment::plain("'s portfolio."));
    let hint = FormattedOutput::new()
        .with(TextSegment::colored("Type ", SegmentColor::Muted))
        .with(TextSegment::colored("help", SegmentColor::Primary).bold())
        .with(TextSegment::colored(
            " to see available commands.",
            SegmentColor::Muted,
        ));
    vec![
        Line::revealed(LineKind::Welcome, greeting),
        Line::revealed(LineKind::Welcome, hint),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::{CommandOutput, CommandRegistry};
    use crate::content::Portfolio;

    fn options() -> SessionOptions {
        SessionOptions::from_config(&Config::default(), &Portfolio::builtin())
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(CommandRegistry::builtin(), Arc::new(Portfolio::builtin()))
    }

    fn drain(session: &mut Session) -> usize {
        let mut ticks = 0;
        while session.tick() {
            ticks += 1;
        }
        ticks
    }

    fn run(session: &mut Session, dispatcher: &Dispatcher, command: &str) {
        session.submit(command, dispatcher);
        drain(session);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_new_session_shows_welcome_banner() {
        let session = Session::new(options());
        assert_eq!(session.lines().len(), 2);
        assert!(session.lines().iter().all(|l| l.kind() == LineKind::Welcome));
        assert!(session.lines()[0]
            .final_content()
            .plain_text()
            .contains("Jordan Avery"));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_submit_echoes_and_reveals_output() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        session.set_pending_input("about");

        let input = session.pending_input().to_string();
        assert_eq!(session.submit(&input, &dispatcher), SessionEffect::None);

        assert_eq!(session.pending_input(), "");
        assert_eq!(session.history(), ["about"]);
        assert_eq!(session.lines().len(), 4);

        let echo = &session.lines()[2];
        assert_eq!(echo.kind(), LineKind::CommandEcho);
        assert!(echo.is_complete());
        let prompt = &echo.final_content().segments()[0];
        assert_eq!(prompt.text, "guest@portfolio:~$");
        assert_eq!(prompt.color, SegmentColor::Primary);
        assert!(prompt.bold);
        assert_eq!(echo.final_content().plain_text(), "guest@portfolio:~$ about");

        let output = &session.lines()[3];
        assert_eq!(output.kind(), LineKind::Output);
        assert!(!output.is_complete());
        assert!(output.revealed_content().is_empty());
        assert!(session.is_busy());

        let ticks = drain(&mut session);
        assert_eq!(ticks, session.lines()[3].final_content().char_count());
        assert!(session.lines()[3].is_complete());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_reveal_is_monotonic_through_the_session() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        session.submit("social", &dispatcher);

        let mut previous = session.lines()[3].revealed_content().clone();
        while session.tick() {
            let current = session.lines()[3].revealed_content().clone();
            assert!(previous.is_strict_prefix_of(&current));
            previous = current;
        }
        assert_eq!(&previous, session.lines()[3].final_content());
    }

    #[test]
    fn test_submit_while_busy_is_rejected() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        session.submit("projects", &dispatcher);
        assert!(session.is_busy());

        let before = session.lines().len();
        session.set_pending_input("about");
        assert_eq!(session.submit("about", &dispatcher), SessionEffect::None);
        assert_eq!(session.lines().len(), before);
        assert_eq!(session.history(), ["projects"]);
        assert_eq!(session.pending_input(), "about");
    }

    #[test]
    fn test_blank_submit_is_a_no_op() {
        let mut session = Session::new(options());
        assert!(session.begin_submit("   ").is_none());
        assert_eq!(session.lines().len(), 2);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_history_navigation_sequence() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        for command in ["about", "stack", "social"] {
            run(&mut session, &dispatcher, command);
        }

        let mut seen = Vec::new();
        for _ in 0..3 {
            assert!(session.navigate_history(HistoryDirection::Older));
            seen.push(session.pending_input().to_string());
        }
        assert_eq!(seen, ["social", "stack", "about"]);

        assert!(!session.navigate_history(HistoryDirection::Older));
        assert_eq!(session.pending_input(), "about");
        assert_eq!(session.history_cursor(), Some(2));

        session.navigate_history(HistoryDirection::Newer);
        assert_eq!(session.pending_input(), "stack");

        session.navigate_history(HistoryDirection::Newer);
        session.navigate_history(HistoryDirection::Newer);
        assert_eq!(session.pending_input(), "");
        assert_eq!(session.history_cursor(), None);
        assert!(!session.navigate_history(HistoryDirection::Newer));
    }

    #[test]
    fn test_history_navigation_is_ignored_while_busy() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        run(&mut session, &dispatcher, "about");
        session.submit("stack", &dispatcher);

        assert!(!session.navigate_history(HistoryDirection::Older));
        assert_eq!(session.history_cursor(), None);
    }

    #[test]
    fn test_clear_resets_to_welcome_and_forgets_history() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        run(&mut session, &dispatcher, "about");
        run(&mut session, &dispatcher, "stack");

        assert_eq!(session.submit("CLEAR --all", &dispatcher), SessionEffect::None);
        assert!(!session.is_busy());
        assert!(session.history().is_empty());
        assert_eq!(session.lines().len(), 2);
        let fresh = Session::new(options());
        for (line, expected) in session.lines().iter().zip(fresh.lines()) {
            assert_eq!(line.kind(), LineKind::Welcome);
            assert_eq!(line.final_content(), expected.final_content());
        }
    }

    #[test]
    fn test_reload_asks_the_host_to_rebuild() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        assert_eq!(session.submit("reload", &dispatcher), SessionEffect::Reload);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_projects_end_to_end() {
        let portfolio = Portfolio::builtin();
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        run(&mut session, &dispatcher, "projects");

        let output = session.lines().last().unwrap();
        assert_eq!(output.kind(), LineKind::Output);
        let segments = output.revealed_content().segments();
        assert!(segments[0].text.contains("MY PROJECTS"));
        assert!(segments[0].bold);

        let links: Vec<&str> = segments.iter().filter_map(|s| s.url.as_deref()).collect();
        let expected: Vec<&str> = portfolio.projects.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn test_unknown_command_is_an_animated_error_line() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        session.submit("frobnicate", &dispatcher);

        let line = session.lines().last().unwrap();
        assert_eq!(line.kind(), LineKind::Error);
        assert!(!line.is_complete());
        drain(&mut session);
        assert!(session
            .lines()
            .last()
            .unwrap()
            .revealed_content()
            .plain_text()
            .contains("frobnicate"));
        assert_eq!(session.history(), ["frobnicate"]);
    }

    #[test]
    fn test_plain_lines_are_appended_as_each_completes() {
        let mut registry = CommandRegistry::new();
        registry.register("poem", "three lines", |_, _| {
            Ok(CommandOutput::ok("ab\ncd\nef\n"))
        });
        let dispatcher = Dispatcher::new(registry, Arc::new(Portfolio::builtin()));
        let mut session = Session::new(options());
        session.submit("poem", &dispatcher);

        // Welcome (2) + echo + first line.
        assert_eq!(session.lines().len(), 4);
        session.tick();
        assert_eq!(session.lines().len(), 4);
        session.tick();
        assert_eq!(session.lines().len(), 5);
        assert!(session.lines()[3].is_complete());
        assert!(session.lines()[4].revealed_content().is_empty());

        drain(&mut session);
        let texts: Vec<String> = session.lines()[3..]
            .iter()
            .map(|l| l.revealed_content().plain_text())
            .collect();
        assert_eq!(texts, ["ab", "cd", "ef"]);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_interrupt_on_submit_snaps_running_reveal() {
        let mut registry = CommandRegistry::new();
        registry.register("long", "two lines", |_, _| Ok(CommandOutput::ok("one\ntwo")));
        let dispatcher = Dispatcher::new(registry, Arc::new(Portfolio::builtin()));
        let mut session = Session::new(SessionOptions {
            interrupt_on_submit: true,
            ..options()
        });

        session.submit("long", &dispatcher);
        session.tick();
        session.submit("long", &dispatcher);

        let kinds: Vec<LineKind> = session.lines()[2..].iter().map(Line::kind).collect();
        assert_eq!(
            kinds,
            [
                LineKind::CommandEcho,
                LineKind::Output,
                LineKind::Output,
                LineKind::CommandEcho,
                LineKind::Output,
            ]
        );
        assert!(session.lines()[3].is_complete());
        assert_eq!(session.lines()[4].revealed_content().plain_text(), "two");
        assert!(session.is_busy());
    }

    #[test]
    fn test_dispatching_rejects_even_with_interrupt() {
        let mut session = Session::new(SessionOptions {
            interrupt_on_submit: true,
            ..options()
        });
        assert_eq!(session.begin_submit("about").as_deref(), Some("about"));
        assert!(session.is_dispatching());
        assert!(session.begin_submit("stack").is_none());
        assert_eq!(session.history(), ["about"]);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut session = Session::new(options());
        let effect = session.finish_submit(CommandResult::reload());
        assert_eq!(effect, SessionEffect::None);
        assert_eq!(session.lines().len(), 2);
    }

    #[test]
    fn test_finish_reveal_completes_everything() {
        let dispatcher = dispatcher();
        let mut session = Session::new(options());
        session.submit("sudo", &dispatcher);
        assert!(session.finish_reveal());
        assert!(!session.is_busy());
        assert!(session.lines().iter().all(Line::is_complete));
        assert!(!session.finish_reveal());
    }

    #[test]
    fn test_input_editing() {
        let mut session = Session::new(options());
        session.insert_char('a');
        session.insert_str("bé");
        assert_eq!(session.pending_input(), "abé");
        session.backspace();
        assert_eq!(session.pending_input(), "ab");
        session.clear_input();
        assert_eq!(session.pending_input(), "");
    }
}
