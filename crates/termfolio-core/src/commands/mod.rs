//! Command registry and dispatcher.
//!
//! The registry is an explicit table built at startup and handed to the
//! [`Dispatcher`], so tests can swap in their own handlers. Resolution never
//! fails: unknown commands, handler errors and handler panics all come back
//! as error-flagged [`CommandResult`]s.
//!
//! ## Resolution order
//!
//! 1. Trim and split the input on whitespace; lowercase the command token.
//! 2. `clear` and `reload` short-circuit before the registry is consulted.
//! 3. Exact-name registry lookup (no prefix or fuzzy matching).

mod builtin;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::content::ContentProvider;
use crate::segment::Content;

/// Control commands resolved ahead of the registry.
pub const CLEAR_COMMAND: &str = "clear";
pub const RELOAD_COMMAND: &str = "reload";

/// Help entries for the control commands, which have no handler.
pub const CONTROL_COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: CLEAR_COMMAND,
        description: "Clear the terminal",
    },
    CommandInfo {
        name: RELOAD_COMMAND,
        description: "Restart the session",
    },
];

/// Name and one-line description of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// What a handler produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub content: Content,
    pub is_error: bool,
}

impl CommandOutput {
    pub fn ok(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Displayable content or one of the control signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultContent {
    Output(Content),
    /// Reset the transcript to the welcome banner.
    Clear,
    /// Restart the whole session.
    Reload,
}

/// Outcome of resolving one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub content: ResultContent,
    pub is_error: bool,
}

impl CommandResult {
    pub fn output(content: impl Into<Content>) -> Self {
        Self {
            content: ResultContent::Output(content.into()),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<Content>) -> Self {
        Self {
            content: ResultContent::Output(content.into()),
            is_error: true,
        }
    }

    pub fn clear() -> Self {
        Self {
            content: ResultContent::Clear,
            is_error: false,
        }
    }

    pub fn reload() -> Self {
        Self {
            content: ResultContent::Reload,
            is_error: false,
        }
    }

    /// Plain text of displayable content, `None` for control signals.
    pub fn plain_text(&self) -> Option<String> {
        match &self.content {
            ResultContent::Output(content) => Some(content.plain_text()),
            ResultContent::Clear | ResultContent::Reload => None,
        }
    }
}

impl From<CommandOutput> for CommandResult {
    fn from(output: CommandOutput) -> Self {
        Self {
            content: ResultContent::Output(output.content),
            is_error: output.is_error,
        }
    }
}

/// Everything a handler may read.
pub struct CommandContext<'a> {
    pub content: &'a dyn ContentProvider,
    /// Submitted commands, oldest first (includes the one being resolved).
    pub history: &'a [String],
    /// Registered commands in registration order, followed by the control
    /// commands.
    pub commands: &'a [CommandInfo],
}

/// A command handler.
pub type Handler =
    Arc<dyn Fn(&CommandContext<'_>, &[String]) -> Result<CommandOutput> + Send + Sync>;

/// Table of commands keyed by exact name.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    infos: Vec<CommandInfo>,
    handlers: HashMap<&'static str, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in portfolio command.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Registers a handler, replacing any previous one with the same name.
    pub fn register<F>(
        &mut self,
        name: &'static str,
        description: &'static str,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&CommandContext<'_>, &[String]) -> Result<CommandOutput> + Send + Sync + 'static,
    {
        let info = CommandInfo { name, description };
        match self.infos.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => *existing = info,
            None => self.infos.push(info),
        }
        self.handlers.insert(name, Arc::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    /// Registered commands in registration order.
    pub fn infos(&self) -> &[CommandInfo] {
        &self.infos
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.infos.iter().map(|info| info.name)
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Input split into a command token and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    /// Lowercased command token used for lookup.
    pub command: String,
    /// Command token exactly as typed.
    pub token: String,
    /// Remaining tokens, as typed.
    pub args: Vec<String>,
}

/// Splits raw input on whitespace. Returns `None` for blank input.
pub fn parse_input(raw: &str) -> Option<ParsedInput> {
    let mut parts = raw.split_whitespace();
    let token = parts.next()?;
    Some(ParsedInput {
        command: token.to_lowercase(),
        token: token.to_string(),
        args: parts.map(str::to_string).collect(),
    })
}

/// Message shown for a token with no handler.
pub fn unknown_command_message(token: &str) -> String {
    format!("command not found: {token}. Type 'help' to see available commands.")
}

/// Resolves input against a registry and a content provider.
pub struct Dispatcher {
    registry: CommandRegistry,
    content: Arc<dyn ContentProvider>,
    listing: Vec<CommandInfo>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, content: Arc<dyn ContentProvider>) -> Self {
        let listing = registry
            .infos()
            .iter()
            .chain(CONTROL_COMMANDS)
            .copied()
            .collect();
        Self {
            registry,
            content,
            listing,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn content(&self) -> &dyn ContentProvider {
        self.content.as_ref()
    }

    /// Resolves one line of input. Never panics and never returns an `Err`.
    pub fn resolve(&self, raw: &str, history: &[String]) -> CommandResult {
        let Some(parsed) = parse_input(raw) else {
            return CommandResult::output(String::new());
        };

        match parsed.command.as_str() {
            CLEAR_COMMAND => return CommandResult::clear(),
            RELOAD_COMMAND => return CommandResult::reload(),
            _ => {}
        }

        let Some(handler) = self.registry.get(&parsed.command) else {
            warn!(token = %parsed.token, "unknown command");
            return CommandResult::error(unknown_command_message(&parsed.token));
        };

        let ctx = CommandContext {
            content: self.content.as_ref(),
            history,
            commands: &self.listing,
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler(&ctx, &parsed.args))) {
            Ok(Ok(output)) => {
                debug!(
                    command = %parsed.command,
                    args = parsed.args.len(),
                    is_error = output.is_error,
                    "resolved command"
                );
                output.into()
            }
            Ok(Err(err)) => {
                warn!(command = %parsed.command, error = %format!("{err:#}"), "command failed");
                CommandResult::error(format!("{}: {err:#}", parsed.command))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(command = %parsed.command, panic = %message, "command panicked");
                CommandResult::error(format!("{}: {message}", parsed.command))
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "internal error".to_string()
    }
}
