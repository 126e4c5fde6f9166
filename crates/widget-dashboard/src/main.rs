//! Widget Dashboard - CLI entry point
//!
//! Opens dashboards in the terminal UI, prints listings and share links, and
//! manages the configuration file.

use clap::{Parser, Subcommand};
use dashboard_api::{ApiError, DashboardApi, DashboardClient};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use widget_dashboard::{
    config::{default, xdg, Config, ConfigError, ConfigLoader},
    logging::{self, LogDestination},
    session::SessionContext,
    share::{self, CommandShare, NativeShare, SystemClipboard},
    tui::{app::App, canvas::CanvasScale},
    view::BoardView,
};

/// Terminal client for widget dashboards
#[derive(Parser)]
#[command(name = "wdash")]
#[command(version, about = "Terminal client for widget dashboards")]
struct Cli {
    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the wdash CLI
#[derive(Subcommand)]
enum Commands {
    /// Open one of your dashboards for viewing and editing
    Open {
        /// Dashboard identifier
        dashboard_id: String,
        /// Owner of the dashboard (defaults to session.username)
        #[arg(long)]
        user: Option<String>,
    },

    /// Open someone's dashboard read-only
    Shared {
        /// Owner of the dashboard
        #[arg(required_unless_present = "url")]
        username: Option<String>,
        /// Dashboard identifier
        #[arg(required_unless_present = "url")]
        dashboard_id: Option<String>,
        /// Share link, as printed by `wdash share-url`
        #[arg(long, conflicts_with_all = ["username", "dashboard_id"])]
        url: Option<String>,
    },

    /// List a user's dashboards
    List {
        /// Owner of the dashboards (defaults to session.username)
        #[arg(long)]
        user: Option<String>,
        /// Print the full records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the share link of a dashboard
    ShareUrl {
        /// Dashboard identifier
        dashboard_id: String,
        /// Owner of the dashboard (defaults to session.username)
        #[arg(long)]
        user: Option<String>,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
    /// Print the effective configuration as TOML
    Show,
}

/// Failures of a CLI command.
#[derive(Debug, Error)]
enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("TUI error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No username: pass --user or set session.username in the configuration file")]
    MissingUser,

    #[error("Not a shared dashboard link: {0}")]
    InvalidShareUrl(String),

    #[error("Share origin cannot carry a path: {0}")]
    InvalidShareOrigin(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli.command, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration and installs logging for a non-config command.
///
/// TUI commands log to the configured file (or nowhere) so log lines never
/// land on the alternate screen.
fn prepare(config_path: Option<&Path>, tui: bool) -> Result<Config, CliError> {
    let config = ConfigLoader::load(config_path)?;
    let destination = LogDestination::for_run(tui, config.logging.file_path());
    if let Err(e) = logging::init(config.logging.level, &destination) {
        eprintln!("Warning: logging disabled: {e}");
    }
    Ok(config)
}

fn run_command(command: Commands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        Commands::Open { dashboard_id, user } => {
            let config = prepare(config_path, true)?;
            let username = resolve_user(user, &config)?;
            let session = SessionContext::new(username, config.session.share_origin()?);
            run_tui(BoardView::editable(session, dashboard_id), &config)
        }
        Commands::Shared {
            username,
            dashboard_id,
            url,
        } => {
            let config = prepare(config_path, true)?;
            let (username, dashboard_id) = match (url, username, dashboard_id) {
                (Some(url), _, _) => {
                    share::parse_share_url(&url).ok_or(CliError::InvalidShareUrl(url))?
                }
                (None, Some(username), Some(dashboard_id)) => (username, dashboard_id),
                // clap requires both positionals without --url
                (None, _, _) => return Err(CliError::MissingUser),
            };
            let session = SessionContext::new(username, config.session.share_origin()?);
            run_tui(BoardView::shared(session, dashboard_id), &config)
        }
        Commands::List { user, json } => {
            let config = prepare(config_path, false)?;
            let username = resolve_user(user, &config)?;
            let client = build_client(&config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let dashboards = runtime.block_on(client.list_dashboards(&username))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboards)?);
                return Ok(());
            }
            if dashboards.is_empty() {
                println!("No dashboards for {username}");
            }
            for dashboard in dashboards {
                println!(
                    "{}\t{}",
                    dashboard.dashboard_id,
                    dashboard.display_name().unwrap_or("")
                );
            }
            Ok(())
        }
        Commands::ShareUrl { dashboard_id, user } => {
            let config = prepare(config_path, false)?;
            let username = resolve_user(user, &config)?;
            let origin = config.session.share_origin()?;
            let url = share::share_url(&origin, &username, &dashboard_id)
                .ok_or_else(|| CliError::InvalidShareOrigin(origin.to_string()))?;
            println!("{url}");
            Ok(())
        }
        Commands::Config { action } => run_config_command(config_path, action),
    }
}

/// Handles `wdash config ...` against `path` or the default location.
fn run_config_command(path: Option<&Path>, action: ConfigAction) -> Result<(), CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(xdg::config_path);
    match action {
        ConfigAction::Init { force } => {
            default::create_default_config(&path, force)?;
            println!("Created configuration at {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Validate => {
            let config = ConfigLoader::load_from_path(&path)?;
            config.validate()?;
            println!("Configuration is valid");
        }
        ConfigAction::Show => {
            let config = if path.exists() {
                ConfigLoader::load_from_path(&path)?
            } else {
                Config::default()
            };
            let rendered = toml::to_string_pretty(&config).map_err(|e| {
                ConfigError::SerializeError {
                    message: e.to_string(),
                }
            })?;
            print!("{rendered}");
        }
    }
    Ok(())
}

/// `--user` when given, otherwise the configured username.
fn resolve_user(user: Option<String>, config: &Config) -> Result<String, CliError> {
    let name = user.unwrap_or_else(|| config.session.username.clone());
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::MissingUser);
    }
    Ok(name.to_string())
}

fn build_client(config: &Config) -> Result<DashboardClient, CliError> {
    let timeout = config.api.timeout()?;
    let base_url = config.api.base_url()?;
    Ok(DashboardClient::new(base_url.as_str(), timeout)?)
}

/// Runs the terminal UI over `view` until the user quits.
fn run_tui(view: BoardView, config: &Config) -> Result<(), CliError> {
    let client = build_client(config)?;
    let (cell_width, cell_height) = config.tui.cell_size()?;
    let native: Option<Box<dyn NativeShare>> = CommandShare::new(&config.share.command)
        .map(|command| Box::new(command) as Box<dyn NativeShare>);

    tracing::info!(
        mode = %view.mode(),
        dashboard_id = view.dashboard_id(),
        "starting TUI"
    );
    let mut app = App::new(view, Arc::new(client))
        .with_scale(CanvasScale::new(cell_width, cell_height))
        .with_tick_rate(config.tui.tick_rate()?)
        .with_share(native, Box::new(SystemClipboard));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app.run())?;
    Ok(())
}
