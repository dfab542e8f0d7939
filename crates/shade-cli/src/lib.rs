//! Command-line front end for `shade`.
//!
//! The binary persists the choice in a JSON file and reads the host
//! preference from the OS (or `--prefers`). Each invocation is one page load:
//! the controller is initialized from storage, optionally handed a
//! selection, and its surface printed.
//!
//! ```text
//! shade status
//! shade set dark
//! shade --prefers dark set system
//! shade resolve system dark
//! ```

pub mod render;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;

use shade::{resolve, FileStore, ShadeConfig, Surface, ThemeChoice, ThemeController};

#[derive(Debug, Parser)]
#[command(name = "shade", version, about = "Pick and persist a light, dark or system theme")]
pub struct Cli {
    /// YAML config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preference file, overriding the config and SHADE_STORE.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Host color scheme to assume instead of asking the OS.
    #[arg(long, global = true, value_enum)]
    pub prefers: Option<Scheme>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug details to stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current theme.
    Status,
    /// Select a theme: light, dark or system. Unknown values select system.
    ///
    /// Surrounding whitespace in the argument is ignored.
    Set {
        value: String,
    },
    /// Show the theme a choice resolves to for a host scheme.
    Resolve {
        #[arg(value_parser = parse_choice)]
        choice: ThemeChoice,
        #[arg(value_enum)]
        host: Scheme,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scheme {
    Light,
    Dark,
}

impl Scheme {
    pub fn is_dark(self) -> bool {
        self == Scheme::Dark
    }
}

fn parse_choice(value: &str) -> Result<ThemeChoice, String> {
    value.parse::<ThemeChoice>().map_err(|e| e.to_string())
}

/// Parses `args` and executes the command, writing to `out`.
pub fn run<I, T>(args: I, out: &mut dyn Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    execute(&cli, out)
}

pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match &cli.command {
        Command::Resolve { choice, host } => {
            writeln!(out, "{}", resolve(*choice, host.is_dark()))?;
            Ok(())
        }
        Command::Status => {
            let (config, store_path) = load_settings(cli)?;
            let controller = open(cli, &config, &store_path);
            print_status(&controller, &store_path, out)
        }
        Command::Set { value } => {
            let (config, store_path) = load_settings(cli)?;
            let mut controller = open(cli, &config, &store_path);
            controller.select_value(value.trim());
            print_status(&controller, &store_path, out)
        }
    }
}

fn load_settings(cli: &Cli) -> Result<(ShadeConfig, PathBuf)> {
    let config = match &cli.config {
        Some(path) => ShadeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ShadeConfig::default(),
    };
    let config = config.with_env_overrides(|name| std::env::var(name).ok());
    config.validate().context("invalid configuration")?;

    let store_path = match (&cli.store, &config.store_path) {
        (Some(path), _) | (None, Some(path)) => path.clone(),
        (None, None) => default_store_path()?,
    };
    tracing::debug!(store = %store_path.display(), key = %config.storage_key, "settings loaded");
    Ok((config, store_path))
}

fn default_store_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "shade")
        .context("no home directory to keep theme preferences in; pass --store")?;
    Ok(dirs.config_dir().join("preferences.json"))
}

fn open(cli: &Cli, config: &ShadeConfig, store_path: &Path) -> ThemeController<FileStore, Surface> {
    let prefers_dark = match cli.prefers {
        Some(scheme) => scheme.is_dark(),
        None => shade::detect_prefers_dark(),
    };
    ThemeController::initialize(
        config,
        FileStore::new(store_path),
        Surface::new(config.scheme_attribute.clone()),
        prefers_dark,
    )
}

fn print_status(
    controller: &ThemeController<FileStore, Surface>,
    store_path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let status = render::render_status(controller, &store_path.display().to_string())
        .context("rendering status")?;
    writeln!(out, "{status}")?;
    Ok(())
}
