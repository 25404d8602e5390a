mod app;
mod config;
mod errors;
mod event_handlers;
mod logging;
mod rendering;
mod services_page;
mod widgets;

use std::path::PathBuf;

use app::App;
use clap::Parser;
use config::{Backend, CliOverrides, ResolvedConfig};
use errors::AppError;
use gwconsole_auth::SessionStore;
use tracing::info;

/// Token the local demo store is opened with; it does no authentication
const LOCAL_SESSION: &str = "local";

/// Terminal admin console for an API gateway
#[derive(Parser, Debug)]
#[command(name = "gwconsole", version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Browse the local demo store instead of the gateway API
    #[arg(long)]
    pub local: bool,

    /// Base URL of the gateway admin API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Rows per page on first load
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Store this session token before starting
    #[arg(long, env = "GWCONSOLE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Forget the stored session token and exit
    #[arg(long, conflicts_with = "token")]
    pub logout: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_url: self.api_url.clone(),
            local: self.local,
            page_size: self.page_size,
        }
    }
}

fn open_session(
    config: &ResolvedConfig,
    cli: &Cli,
) -> Result<SessionStore, AppError> {
    if config.backend == Backend::Local {
        return Ok(SessionStore::in_memory(Some(LOCAL_SESSION.to_string())));
    }

    let session = SessionStore::open();
    if cli.logout {
        session.clear()?;
        info!("session token cleared");
    } else if let Some(token) = &cli.token {
        session.set_token(token)?;
        info!("session token stored");
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = config::resolve(cli.config.as_deref(), &cli.overrides())?;
    logging::init(&config.log_file_path)?;
    info!(?config, "starting gwconsole");

    let session = open_session(&config, &cli)?;
    if cli.logout {
        return Ok(());
    }

    let app = App::new(&config, session)?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
