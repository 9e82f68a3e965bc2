//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::Event;
use termfolio_core::commands::CommandResult;
use termfolio_core::session::{HistoryDirection, SessionEffect};
use tracing::debug;

use crate::clock::RevealBudget;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::input::{self, InputAction};
use crate::render;
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.frame_count = app.frame_count.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            if app.scroll_offset > 0 {
                app.scroll_offset = app.scroll_offset.min(render::max_scroll(app));
            }
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::RevealDue(budget) => {
            handle_reveal(app, budget);
            vec![]
        }
        UiEvent::CommandResolved { result } => handle_command_resolved(app, result),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => apply_action(app, input::map_key(key)),
        Event::Paste(text) => {
            app.session.insert_str(&input::sanitize_paste(&text));
            vec![]
        }
        _ => vec![],
    }
}

/// Applies one input action to the session.
pub fn apply_action(app: &mut AppState, action: InputAction) -> Vec<UiEffect> {
    match action {
        InputAction::Submit => {
            let text = app.session.pending_input().to_string();
            match app.session.begin_submit(&text) {
                Some(input) => {
                    app.follow_bottom();
                    vec![UiEffect::Dispatch { input }]
                }
                None => vec![],
            }
        }
        InputAction::HistoryOlder => {
            app.session.navigate_history(HistoryDirection::Older);
            vec![]
        }
        InputAction::HistoryNewer => {
            app.session.navigate_history(HistoryDirection::Newer);
            vec![]
        }
        InputAction::Insert(c) => {
            app.session.insert_char(c);
            vec![]
        }
        InputAction::Backspace => {
            app.session.backspace();
            vec![]
        }
        InputAction::ClearLine => {
            app.session.clear_input();
            vec![]
        }
        InputAction::ScrollUp => {
            let max = render::max_scroll(app);
            app.scroll_offset = app.scroll_offset.saturating_add(app.page_size()).min(max);
            vec![]
        }
        InputAction::ScrollDown => {
            let max = render::max_scroll(app);
            app.scroll_offset = app.scroll_offset.min(max).saturating_sub(app.page_size());
            vec![]
        }
        InputAction::Quit => vec![UiEffect::Quit],
        InputAction::EndOfInput if app.session.pending_input().is_empty() => vec![UiEffect::Quit],
        InputAction::EndOfInput | InputAction::Ignore => vec![],
    }
}

fn handle_reveal(app: &mut AppState, budget: RevealBudget) {
    match budget {
        RevealBudget::Steps(steps) => {
            for _ in 0..steps {
                if app.session.active_line().is_none() {
                    break;
                }
                app.session.tick();
            }
        }
        RevealBudget::Finish => {
            app.session.finish_reveal();
        }
    }
}

fn handle_command_resolved(app: &mut AppState, result: CommandResult) -> Vec<UiEffect> {
    debug!(is_error = result.is_error, "command resolved");
    app.follow_bottom();
    match app.session.finish_submit(result) {
        SessionEffect::Reload => vec![UiEffect::Reload],
        SessionEffect::None => vec![],
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use termfolio_core::commands::{CommandRegistry, Dispatcher};
    use termfolio_core::config::Config;
    use termfolio_core::content::Portfolio;
    use termfolio_core::line::LineKind;
    use termfolio_core::session::{Session, SessionOptions};

    use super::*;
    use crate::theme::Theme;

    fn app() -> AppState {
        let options = SessionOptions::from_config(&Config::default(), &Portfolio::builtin());
        let mut app = AppState::new(Session::new(options), Theme::default());
        app.viewport = (80, 24);
        app
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(CommandRegistry::builtin(), Arc::new(Portfolio::builtin()))
    }

    fn press(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            update(app, press(KeyCode::Char(c)));
        }
    }

    /// Runs a dispatch effect the way the runtime would.
    fn resolve(app: &mut AppState, effects: Vec<UiEffect>) -> Vec<UiEffect> {
        let [UiEffect::Dispatch { input }] = effects.as_slice() else {
            panic!("expected a single dispatch, got {effects:?}");
        };
        let result = dispatcher().resolve(input, app.session.history());
        update(app, UiEvent::CommandResolved { result })
    }

    #[test]
    fn test_enter_emits_dispatch_and_marks_busy() {
        let mut app = app();
        type_text(&mut app, "about");
        let effects = update(&mut app, press(KeyCode::Enter));

        assert_eq!(
            effects,
            vec![UiEffect::Dispatch {
                input: "about".to_string()
            }]
        );
        assert!(app.session.is_dispatching());
        assert_eq!(app.session.pending_input(), "");
    }

    #[test]
    fn test_enter_while_dispatching_is_ignored() {
        let mut app = app();
        type_text(&mut app, "about");
        update(&mut app, press(KeyCode::Enter));
        type_text(&mut app, "stack");

        assert!(update(&mut app, press(KeyCode::Enter)).is_empty());
        assert_eq!(app.session.pending_input(), "stack");
    }

    #[test]
    fn test_resolved_command_reveals_over_ticks() {
        let mut app = app();
        type_text(&mut app, "email");
        let effects = update(&mut app, press(KeyCode::Enter));
        assert!(resolve(&mut app, effects).is_empty());

        let output = app.session.lines().last().unwrap();
        assert_eq!(output.kind(), LineKind::Output);
        assert!(!output.is_complete());

        update(&mut app, UiEvent::RevealDue(RevealBudget::Steps(3)));
        assert_eq!(
            app.session.lines().last().unwrap().revealed_content().char_count(),
            3
        );

        update(&mut app, UiEvent::RevealDue(RevealBudget::Steps(u32::MAX)));
        assert!(app.session.lines().last().unwrap().is_complete());
        assert!(!app.session.is_busy());
    }

    #[test]
    fn test_finish_budget_completes_reveal() {
        let mut app = app();
        type_text(&mut app, "sudo");
        let effects = update(&mut app, press(KeyCode::Enter));
        resolve(&mut app, effects);

        update(&mut app, UiEvent::RevealDue(RevealBudget::Finish));
        assert!(!app.session.is_busy());
        assert!(app.session.lines().iter().all(|l| l.is_complete()));
    }

    #[test]
    fn test_reload_result_becomes_reload_effect() {
        let mut app = app();
        type_text(&mut app, "reload");
        let effects = update(&mut app, press(KeyCode::Enter));
        assert_eq!(resolve(&mut app, effects), vec![UiEffect::Reload]);
    }

    #[test]
    fn test_history_keys_browse_submitted_commands() {
        let mut app = app();
        for command in ["about", "stack"] {
            type_text(&mut app, command);
            let effects = update(&mut app, press(KeyCode::Enter));
            resolve(&mut app, effects);
            update(&mut app, UiEvent::RevealDue(RevealBudget::Finish));
        }

        update(&mut app, press(KeyCode::Up));
        assert_eq!(app.session.pending_input(), "stack");
        update(&mut app, press(KeyCode::Up));
        assert_eq!(app.session.pending_input(), "about");
        update(&mut app, press(KeyCode::Down));
        assert_eq!(app.session.pending_input(), "stack");
    }

    #[test]
    fn test_ctrl_d_quits_only_on_empty_input() {
        let mut app = app();
        let ctrl_d = || {
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char('d'),
                KeyModifiers::CONTROL,
            )))
        };
        type_text(&mut app, "x");
        assert!(update(&mut app, ctrl_d()).is_empty());
        update(&mut app, press(KeyCode::Backspace));
        assert_eq!(update(&mut app, ctrl_d()), vec![UiEffect::Quit]);
    }

    #[test]
    fn test_paste_inserts_single_line() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::Terminal(Event::Paste("help\nabout".to_string())),
        );
        assert_eq!(app.session.pending_input(), "helpabout");
    }

    fn run_to_completion(app: &mut AppState, command: &str) {
        type_text(app, command);
        let effects = update(app, press(KeyCode::Enter));
        resolve(app, effects);
        update(app, UiEvent::RevealDue(RevealBudget::Finish));
    }

    #[test]
    fn test_scrolling_pages_and_submit_follows_bottom() {
        let mut app = app();
        for _ in 0..3 {
            run_to_completion(&mut app, "help");
        }
        let max = render::max_scroll(&app);
        assert!(max > app.page_size());

        update(&mut app, press(KeyCode::PageUp));
        assert_eq!(app.scroll_offset, 22);
        update(&mut app, press(KeyCode::PageDown));
        update(&mut app, press(KeyCode::PageDown));
        assert_eq!(app.scroll_offset, 0);

        update(&mut app, press(KeyCode::PageUp));
        type_text(&mut app, "help");
        update(&mut app, press(KeyCode::Enter));
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_up_on_short_transcript_stays_at_bottom() {
        let mut app = app();
        for _ in 0..10 {
            update(&mut app, press(KeyCode::PageUp));
        }
        assert_eq!(app.scroll_offset, 0);
        assert!(!render::line_text(&render::status_line(&app)).contains("scrolled"));
    }

    #[test]
    fn test_scroll_offset_is_capped_at_top_of_transcript() {
        let mut app = app();
        for _ in 0..3 {
            run_to_completion(&mut app, "help");
        }
        let max = render::max_scroll(&app);

        for _ in 0..50 {
            update(&mut app, press(KeyCode::PageUp));
        }
        assert_eq!(app.scroll_offset, max);
        assert!(
            render::line_text(&render::status_line(&app))
                .contains(&format!("[scrolled up {max} rows]"))
        );

        update(&mut app, press(KeyCode::PageDown));
        assert_eq!(app.scroll_offset, max.saturating_sub(app.page_size()));
    }

    #[test]
    fn test_resize_clamps_scroll_offset() {
        let mut app = app();
        for _ in 0..3 {
            run_to_completion(&mut app, "help");
        }
        for _ in 0..50 {
            update(&mut app, press(KeyCode::PageUp));
        }

        update(&mut app, UiEvent::Frame {
            width: 80,
            height: 200,
        });
        assert_eq!(app.scroll_offset, render::max_scroll(&app));
    }

    #[test]
    fn test_tick_advances_frame_counter() {
        let mut app = app();
        update(&mut app, UiEvent::Tick);
        update(&mut app, UiEvent::Frame {
            width: 100,
            height: 40,
        });
        assert_eq!(app.frame_count, 1);
        assert_eq!(app.viewport, (100, 40));
    }
}
