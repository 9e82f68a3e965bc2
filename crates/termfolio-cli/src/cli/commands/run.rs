//! One-shot command handler.
//!
//! Resolves a single command through the same dispatcher the TUI uses and
//! prints the plain text, without animation.

use std::sync::Arc;

use anyhow::{Result, bail};
use termfolio_core::commands::{CommandRegistry, Dispatcher, ResultContent};
use termfolio_core::content::Portfolio;
use tracing::debug;

pub fn run(portfolio: Portfolio, words: &[String]) -> Result<()> {
    let input = words.join(" ");
    let dispatcher = Dispatcher::new(CommandRegistry::builtin(), Arc::new(portfolio));
    let history = [input.clone()];
    let result = dispatcher.resolve(&input, &history);
    debug!(%input, is_error = result.is_error, "resolved one-shot command");

    let text = match result.content {
        ResultContent::Output(content) => content.plain_text(),
        ResultContent::Clear | ResultContent::Reload => {
            bail!("'{}' only works in the interactive terminal", input.trim())
        }
    };

    if result.is_error {
        bail!("{text}");
    }
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
    Ok(())
}
