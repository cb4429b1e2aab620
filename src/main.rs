use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use tempo::geolocation::ConfiguredPosition;
use tempo::regions::RegionDirectoryClient;
use tempo::resolver::LocationFlow;
use tempo::store::LocationStore;
use tempo::weather::WeatherClient;
use tempo::{TempoConfig, ui};
use tracing_subscriber::EnvFilter;

const ABOUT: &str = "Terminal weather screen for Brazilian locations";

const LONG_ABOUT: &str = "
Shows current conditions and the multi-day forecast for your location.

The position comes from the configured coordinates when available; otherwise
the last state/city you picked is restored. Use 'l' inside the screen to pick
a state and city manually. The weather endpoint key is read from the API_KEY
environment variable (API_URL overrides the endpoint base).
";

#[derive(Parser, Debug)]
#[command(version, about = ABOUT, long_about = LONG_ABOUT)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging (written to stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "tempo=debug" } else { "tempo=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = TempoConfig::load_from_path(args.config)?;
    let store = LocationStore::open(config.store_path())?;
    let geolocation = Box::new(ConfiguredPosition::from_config(&config.geolocation));

    let mut flow = LocationFlow::new(
        WeatherClient::new(&config.weather)?,
        RegionDirectoryClient::new(&config.regions)?,
        store,
        geolocation,
    );
    flow.initial_resolve().await;

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run(&mut terminal, &mut flow).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
