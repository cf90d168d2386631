// ABOUTME: Main entry point for the Market Alerts notification client

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    Terminal,
};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{error, info};

use market_alerts::api::HttpNotificationApi;
use market_alerts::app::{App, AppEvent, EventHandler};
use market_alerts::components::LayoutComponent;
use market_alerts::config::AlertConfig;
use market_alerts::delivery::{AlertSink, SilentSink, TerminalBell};

/// Poll the marketplace notification API and show alerts in the terminal
#[derive(Debug, Parser)]
#[command(name = "market-alerts", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend origin, e.g. https://market.example.com
    #[arg(long)]
    base_url: Option<String>,

    /// User whose notifications are polled
    #[arg(long)]
    user_id: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    no_sound: bool,

    /// Print notifications line by line instead of running the TUI
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging()?;

    let config = build_config(&cli)?;
    let api = HttpNotificationApi::new(&config).context("Failed to create notification client")?;
    let sink: Box<dyn AlertSink> = if config.sound_enabled {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(SilentSink)
    };

    let mut app = App::start(&config, api, sink);
    if config.user_id.is_none() {
        eprintln!("No user id configured; set --user-id or MARKET_ALERTS_USER_ID to start polling.");
    }

    if cli.headless {
        run_headless(&mut app, tokio::signal::ctrl_c()).await?;
    } else {
        setup_panic_handler();
        let mut layout = LayoutComponent::new();
        run_tui(&mut app, &mut layout).await?;
    }

    app.shutdown();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<AlertConfig> {
    let mut config = AlertConfig::load(cli.config.as_deref())?;
    config.apply_env();

    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(user) = &cli.user_id {
        config.user_id = Some(user.clone());
    }
    if let Some(interval) = cli.interval_ms {
        config.poll_interval_ms = interval;
    }
    if cli.no_sound {
        config.sound_enabled = false;
    }

    config.validate()?;
    info!(
        "Configured for {} (user: {:?}, interval: {}ms)",
        config.base_url, config.user_id, config.poll_interval_ms
    );
    Ok(config)
}

/// Print delivered notifications until `shutdown` resolves.
async fn run_headless<S>(app: &mut App, shutdown: S) -> Result<()>
where
    S: std::future::Future<Output = io::Result<()>>,
{
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for report in app.tick() {
                    for notification in &report.delivered {
                        let metadata = notification.metadata();
                        println!(
                            "[{}] {} {}: {}",
                            chrono::Local::now().format("%H:%M:%S"),
                            metadata.icon,
                            metadata.label,
                            notification.message
                        );
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Received ctrl-c, shutting down");
                break;
            }
        }
    }
    Ok(())
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    // Check if we're in a proper terminal
    if let Err(e) = crossterm::terminal::is_raw_mode_enabled() {
        eprintln!("Cannot check terminal raw mode: {}", e);
        return Err(anyhow::anyhow!("Terminal not compatible: {}", e));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            let app_event = match event::read()? {
                Event::Key(key_event) => EventHandler::handle_key_event(key_event, &mut app.state),
                Event::FocusGained => Some(AppEvent::FocusGained),
                Event::FocusLost => Some(AppEvent::FocusLost),
                Event::Mouse(_) | Event::Resize(_, _) | Event::Paste(_) => None,
            };
            if let Some(app_event) = app_event {
                EventHandler::process_event(app_event, &mut app.state);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            break;
        }

        // Let the poll task make progress between frames.
        tokio::task::yield_now().await;
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn setup_logging() -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    // Create log directory if it doesn't exist
    let log_dir = std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".market-alerts").join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".market-alerts/logs"));

    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    // Create log file with timestamp
    let log_file = log_dir.join(format!(
        "market-alerts-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false) // No ANSI colors in log file
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_alerts=info".into())
        )
        .init();

    Ok(())
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stderr(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        );

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
