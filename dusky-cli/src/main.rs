mod bootstrap;
mod commands;
#[cfg(feature = "gtk")]
mod gtk_app;
mod spawn;
mod ui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use dusky_core::bootstrap::{BootstrapOutcome, Requirements};
use dusky_core::config::{Config, load_config, resolve_config_path};
use dusky_core::dispatch::Dispatcher;
use dusky_core::terminal::find_terminal;

use bootstrap::{ensure_dependencies, restart_self};
use spawn::DetachedSpawner;

#[derive(Parser)]
#[command(name = "dusky")]
#[command(about = "Launch system tools from a configurable control center", long_about = None)]
struct Cli {
    /// Config file [default: dusky_config.yaml beside the executable, or $DUSKY_CONFIG]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Which window to open
    #[arg(long, global = true, value_enum, default_value_t = Frontend::Tui)]
    frontend: Frontend,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Frontend {
    /// Full-screen terminal interface
    Tui,
    /// libadwaita preferences window
    Gtk,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the control center (default)
    Ui,
    /// Check terminals, launcher, libraries and the config file
    Doctor,
    /// Write a starter config
    Init {
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the configured pages and items
    List {
        #[arg(long)]
        json: bool,
    },
    /// Run one item without opening a window
    Run { page: String, item: String },
}

fn init_tracing(log_to_file: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let is_json = matches!(
        std::env::var("DUSKY_LOG_FORMAT").ok().as_deref(),
        Some("json") | Some("JSON")
    );

    // The full-screen UI owns the terminal, so its logs go to a file
    let writer = if log_to_file {
        let path = std::env::temp_dir().join("dusky-control-center.log");
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(std::io::sink),
        }
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!log_to_file)
        .with_writer(writer);
    if is_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let full_screen =
        matches!(cli.command, None | Some(Commands::Ui)) && cli.frontend == Frontend::Tui;
    init_tracing(full_screen);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref());

    match cli.command {
        Some(Commands::Doctor) => commands::run_doctor(&config_path),
        Some(Commands::Init { yes }) => commands::run_init(&config_path, yes),
        Some(Commands::List { json }) => {
            let config = load_strict(&config_path)?;
            commands::run_list(&config, json)
        }
        Some(Commands::Run { page, item }) => {
            let config = load_strict(&config_path)?;
            let dispatcher = Dispatcher::new(
                DetachedSpawner,
                find_terminal(),
                config.window.title.clone(),
            );
            commands::run_item(&config, &dispatcher, &page, &item)
        }
        Some(Commands::Ui) | None => run_ui(cli.frontend, &config_path),
    }
}

const NO_GTK: &str = "this build has no GTK support; rebuild with `--features gtk`";

fn load_strict(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).with_context(|| format!("loading {}", path.display()))
}

fn run_ui(frontend: Frontend, config_path: &Path) -> anyhow::Result<()> {
    if frontend == Frontend::Gtk && !cfg!(feature = "gtk") {
        bail!(NO_GTK);
    }

    let requirements = match frontend {
        Frontend::Tui => Requirements::none(),
        Frontend::Gtk => Requirements::gtk(),
    };
    match ensure_dependencies(&requirements)? {
        BootstrapOutcome::Ready => {}
        BootstrapOutcome::RestartRequested => return Err(restart_self().into()),
    }

    let config = load_config(config_path);
    let terminal = find_terminal();
    tracing::info!(
        config = %config_path.display(),
        terminal = terminal.as_deref().unwrap_or("none"),
        pages = config.pages.len(),
        "starting"
    );

    match frontend {
        Frontend::Tui => {
            let dispatcher = Dispatcher::new(DetachedSpawner, terminal, config.window.title.clone());
            ui::run_tui(&config, &dispatcher)?;
            Ok(())
        }
        #[cfg(feature = "gtk")]
        Frontend::Gtk => gtk_app::run_gtk(config, terminal),
        #[cfg(not(feature = "gtk"))]
        Frontend::Gtk => bail!(NO_GTK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_tui() {
        let cli = Cli::try_parse_from(["dusky"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.frontend, Frontend::Tui);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dusky", "list", "--json", "--config", "/tmp/c.yaml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/c.yaml")));
    }

    #[test]
    fn test_cli_run_takes_page_and_item() {
        let cli = Cli::try_parse_from(["dusky", "--frontend", "gtk", "run", "System", "Update"])
            .unwrap();
        assert_eq!(cli.frontend, Frontend::Gtk);
        match cli.command {
            Some(Commands::Run { page, item }) => {
                assert_eq!(page, "System");
                assert_eq!(item, "Update");
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_list_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_strict(&dir.path().join("dusky_config.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("Config file missing"));
    }
}
