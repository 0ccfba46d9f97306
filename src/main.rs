mod api;
mod app;
mod chart;
mod config;
mod fetch;
mod store;
mod theme;
mod types;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use api::{CoinGeckoClient, MarketData};
use app::App;
use config::Config;
use fetch::{FetchResult, Fetcher};

/// Terminal dashboard for CoinGecko prices and charts.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Quote currency for this session (usd, eur, btc, ...)
    #[arg(long)]
    currency: Option<String>,

    /// Color theme for this session
    #[arg(long)]
    theme: Option<String>,

    /// Chart range in days (1, 7 or 30)
    #[arg(long)]
    days: Option<u32>,

    /// Read the config from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(ref currency) = self.currency {
            cfg.currency = currency.clone();
        }
        if let Some(ref theme) = self.theme {
            cfg.theme = theme.clone();
        }
        if let Some(days) = self.days {
            cfg.chart_days = days;
        }
        cfg.sanitized()
    }
}

/// Logs go to a daily file; the terminal belongs to the UI.
fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let mut log_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    log_dir.push("coinboard");
    log_dir.push("logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "coinboard.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinboard=info,warn".into()),
        )
        .init();

    info!(?log_dir, "logging initialised");
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = cli.apply(config);
    info!(currency = %config.currency, theme = %config.theme, "config loaded");

    let client = CoinGeckoClient::new()?;
    let (fetcher, results) = Fetcher::new(client, &config.currency);
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &fetcher, results).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!("fatal: {:#}", e);
    }
    info!("dashboard stopped");
    result
}

async fn run_app<C: MarketData>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    fetcher: &Fetcher<C>,
    mut results: UnboundedReceiver<FetchResult>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    app.start(fetcher);

    loop {
        while let Ok(result) = results.try_recv() {
            app.apply(result);
        }
        app.on_tick(fetcher);

        terminal.draw(|f| ui::draw(f, &mut *app))?;

        if app.quit {
            return Ok(());
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key, fetcher),
                Event::Mouse(mouse) => app.handle_mouse(mouse, fetcher),
                _ => {}
            }
        }
    }
}
