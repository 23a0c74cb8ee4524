use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use procmon::app::{App, run_interactive};
use procmon::config::{self, load_config, load_config_from_path};
use procmon::event::EventHandler;
use procmon::logging;
use procmon::system::platform;
use procmon::ui::{self, theme::ColorSupport, theme::Theme};

#[derive(Parser)]
#[command(
    name = "procmon",
    about = "Terminal process monitor: ranked CPU/MEM table with kill support"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Number of process rows to show
    #[arg(long)]
    rows: Option<usize>,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Process information filesystem root
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Print this many frames without reading input, then exit.
    #[arg(long)]
    iterations: Option<usize>,

    /// Emit batch frames as JSON lines instead of tables.
    #[arg(long, default_value_t = false, requires = "iterations")]
    json: bool,

    /// Write structured logs (JSON lines) to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `procmon=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_tracing_json(path, &cli.log_level)?;
    }
    let config = load_config_for_cli(&cli);
    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("--refresh-rate must be greater than 0"));
    }
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    tracing::info!(
        refresh_rate_ms = config.general.refresh_rate_ms,
        proc_root = %config.general.proc_root.display(),
        "starting"
    );

    let mut app = App::new(&config);

    if let Some(iterations) = cli.iterations {
        return run_batch(&mut app, tick_rate, iterations, cli.json).await;
    }

    let support = ColorSupport::resolve(config.display.color);
    let theme = Theme::from_config(&config.display, support);
    run(&mut app, &theme, tick_rate).await?;

    println!("Exiting procmon.");
    Ok(())
}

async fn run(app: &mut App, theme: &Theme, tick_rate: Duration) -> Result<()> {
    let mut events = EventHandler::new(platform::stdin_reader(), tick_rate);
    let mut out = stdout();
    run_interactive(app, theme, &mut events, &mut out).await?;
    Ok(())
}

async fn run_batch(app: &mut App, tick_rate: Duration, iterations: usize, json: bool) -> Result<()> {
    if iterations == 0 {
        return Err(eyre!("--iterations must be greater than 0"));
    }

    for i in 0..iterations {
        tokio::time::sleep(tick_rate).await;
        app.refresh_data();
        if json {
            println!("{}", serde_json::to_string(&app.snapshot)?);
        } else {
            if i > 0 {
                println!();
            }
            println!("{}", ui::render_plain(&app.snapshot));
        }
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(rows) = cli.rows {
        config.display.max_rows = rows;
    }
    if cli.no_color {
        config.display.color = false;
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }

    config
}
