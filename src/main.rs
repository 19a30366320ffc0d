mod api;
mod app;
mod app_state;
mod config;
mod error;
mod render;
mod search;
mod ui;
mod view;

use clap::Parser;
use config::Config;
use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use render::TerminalRenderer;
use std::sync::Arc;
use std::{io, panic};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n\nTalks to a Global Explorer backend (/api/explore) and shows\n",
    "current weather, a city photo, and nearby famous sites.\n",
    "Provider API keys are stored locally and sent as request headers.\n"
);

#[derive(Parser)]
#[command(version, long_version = LONG_VERSION, about = "Terminal city explorer", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "CITY",
        conflicts_with = "random",
        help = "Search this city immediately on startup"
    )]
    city: Option<String>,

    #[arg(
        short,
        long,
        help = "Start with a random destination from the built-in list"
    )]
    random: bool,

    #[arg(
        long,
        value_name = "URL",
        help = "Explorer backend endpoint (overrides the config file)"
    )]
    endpoint: Option<String>,

    #[arg(long, value_name = "PATH", help = "Use an alternate config file")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show, ResetColor);
        default_hook(info);
    }));

    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => match Config::default_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{}", e.user_friendly_message());
                std::process::exit(1);
            }
        },
    };

    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(_) => {
            // First run, or an unreadable file. Keys can be entered in the
            // settings panel (Ctrl-K) and are saved back to this path.
            eprintln!("No config found at {}, using defaults.", config_path.display());
            eprintln!("\nExample config.toml:");
            eprintln!("  [server]");
            eprintln!("  endpoint = \"{}\"", config::DEFAULT_ENDPOINT);
            eprintln!("  [keys]");
            eprintln!("  openweather = \"<your OpenWeatherMap key>\"");
            eprintln!("  unsplash = \"<your Unsplash key>\"");
            eprintln!();
            Config::default()
        }
    };

    if let Some(endpoint) = cli.endpoint.clone() {
        config.server.endpoint = endpoint;
    }

    let backend = Arc::new(api::HttpBackend::new(&config.server.endpoint));

    let mut renderer = match TerminalRenderer::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("\nFailed to open the terminal: {}\n", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = renderer.init() {
        eprintln!("\nFailed to initialize the terminal: {}\n", e);
        std::process::exit(1);
    }

    let mut app = app::App::new(config, config_path, backend);

    if let Some(ref city) = cli.city {
        app.search_city(city);
    } else if cli.random {
        let mut rng = rand::rng();
        app.search_city(search::random_destination(&mut rng));
    }

    let result = tokio::select! {
        res = app.run(&mut renderer) => res,
        _ = tokio::signal::ctrl_c() => {
            Ok(())
        }
    };

    renderer.cleanup()?;

    if let Err(e) = result {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
