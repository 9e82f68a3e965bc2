//! Interactive mode handler.

use anyhow::{Context, Result};
use termfolio_core::config::Config;
use termfolio_core::content::Portfolio;
use tokio::runtime::Runtime;

pub fn run(config: Config, portfolio: Portfolio) -> Result<()> {
    // Commands resolve on this runtime's blocking pool.
    let rt = Runtime::new().context("create tokio runtime")?;
    let _enter = rt.enter();

    termfolio_tui::run_interactive(config, portfolio).context("interactive session failed")
}
