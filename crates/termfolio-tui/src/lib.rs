//! Full-screen TUI for termfolio.

pub mod clock;
pub mod effects;
pub mod events;
pub mod input;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod update;

use std::io::{IsTerminal, Write, stderr, stdout};

use anyhow::Result;
pub use runtime::TuiRuntime;
use termfolio_core::config::Config;
use termfolio_core::content::Portfolio;

/// Runs the interactive terminal until the user quits.
///
/// Must be called from within a tokio runtime context; commands are
/// resolved on its blocking pool.
pub fn run_interactive(config: Config, portfolio: Portfolio) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Use `termfolio run <COMMAND>` for plain output."
        );
    }

    let mut runtime = TuiRuntime::new(config, portfolio)?;
    let result = runtime.run();
    // Restore the terminal before printing anything.
    drop(runtime);
    result?;

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
