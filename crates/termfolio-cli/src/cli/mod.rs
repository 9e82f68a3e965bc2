//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use termfolio_core::config::{self, ThemeName};
use termfolio_core::content::Portfolio;
use tracing::info;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "termfolio")]
#[command(version)]
#[command(about = "A portfolio you browse like a shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Portfolio content file (TOML or JSON); overrides `content_file`
    #[arg(long, value_name = "PATH", global = true)]
    content: Option<PathBuf>,

    /// Color theme (default, dracula, solarized)
    #[arg(long, value_name = "NAME", global = true)]
    theme: Option<ThemeName>,

    /// Print output instantly instead of typing it out
    #[arg(long = "no-animation", global = true)]
    no_animation: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Resolve one command and print its output as plain text
    Run {
        /// Command followed by its arguments (e.g. `help stack`)
        #[arg(
            value_name = "COMMAND",
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        words: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print a fresh config generated from the built-in defaults
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the config file is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        };
    }

    let mut config = config::Config::load().context("load config")?;
    if let Some(path) = &cli.content {
        config.content_file = Some(path.to_string_lossy().into_owned());
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.no_animation {
        config.typing_interval_ms = 0;
    }

    let _log_guard = logging::init(&config).context("initialize logging")?;
    info!(theme = config.theme.display_name(), "starting termfolio");

    let portfolio =
        Portfolio::load(config.content_path().as_deref()).context("load portfolio content")?;

    match cli.command {
        None => commands::tui::run(config, portfolio),
        Some(Commands::Run { words }) => commands::run::run(portfolio, &words),
        Some(Commands::Config { .. }) => Ok(()),
    }
}
