// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod config;
mod data;
mod error;
mod events;
mod source;
mod ui;

#[cfg(feature = "subscribe")]
mod subscribe;

use app::{App, View};
use config::Settings;
use source::{FileSource, SampleSource, SimulatedSource, StreamSource};

/// How long to wait for terminal input before pumping sources again.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Terminal dashboard for live IoT telemetry")]
struct Args {
    /// Settings file (TOML). PULSEWATCH_* environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read a file holding the device's latest payload
    #[cfg_attr(
        feature = "subscribe",
        arg(short, long, conflicts_with_all = ["connect", "subscribe"])
    )]
    #[cfg_attr(not(feature = "subscribe"), arg(short, long, conflicts_with_all = ["connect"]))]
    file: Option<PathBuf>,

    /// Connect to a TCP endpoint streaming newline-delimited payloads (host:port)
    #[cfg_attr(
        feature = "subscribe",
        arg(short, long, conflicts_with_all = ["file", "subscribe"])
    )]
    #[cfg_attr(not(feature = "subscribe"), arg(short, long, conflicts_with_all = ["file"]))]
    connect: Option<String>,

    /// Subscribe to the MQTT broker configured under [mqtt]
    #[cfg(feature = "subscribe")]
    #[arg(long, conflicts_with_all = ["file", "connect"])]
    subscribe: bool,

    /// Topic to subscribe to (overrides mqtt.topic)
    #[cfg(feature = "subscribe")]
    #[arg(long, requires = "subscribe")]
    topic: Option<String>,

    /// Start with the simulator feeding the dashboard
    #[arg(long)]
    simulate: bool,

    /// Temperature alarm threshold in °C (overrides thresholds.temperature)
    #[arg(long)]
    temp_threshold: Option<f64>,

    /// Vibration alarm threshold in percent (overrides thresholds.vibration)
    #[arg(long)]
    vib_threshold: Option<f64>,

    /// Number of samples kept in the rolling history (overrides buffers.history)
    #[arg(long)]
    history: Option<usize>,

    /// Write logs to this file (RUST_LOG sets the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Read --file once, export the resulting state to JSON and exit
    #[arg(short, long, requires = "file")]
    export: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of loaded settings.
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(t) = self.temp_threshold {
            settings.thresholds.temperature = t;
        }
        if let Some(v) = self.vib_threshold {
            settings.thresholds.vibration = v;
        }
        if let Some(n) = self.history {
            settings.buffers.history = n;
        }
        #[cfg(feature = "subscribe")]
        if let Some(ref topic) = self.topic {
            settings.mqtt.topic = topic.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply_overrides(&mut settings);
    settings.validate()?;

    // Handle export mode (non-interactive)
    if let (Some(export_path), Some(file)) = (&args.export, &args.file) {
        return export_to_file(file, export_path, &settings);
    }

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &settings, args.simulate);
    }

    // Handle subscribe mode (MQTT broker)
    #[cfg(feature = "subscribe")]
    if args.subscribe {
        return run_with_subscribe(&settings, args.simulate);
    }

    if let Some(ref path) = args.file {
        return run_tui(Box::new(FileSource::new(path)), &settings, args.simulate);
    }

    // Default: the simulator is the live source
    let source = Box::new(SimulatedSource::new(settings.simulator.clone()));
    run_tui(source, &settings, false)
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,pulsewatch=debug".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

/// Run with an MQTT subscription
#[cfg(feature = "subscribe")]
fn run_with_subscribe(settings: &Settings, simulate: bool) -> Result<()> {
    use subscribe::create_subscriber;

    // The runtime drives the MQTT event loop while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let (source, handle) = rt.block_on(create_subscriber(&settings.mqtt))?;

    let result = run_tui(Box::new(source), settings, simulate);

    handle.abort();
    result
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, settings: &Settings, simulate: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, &format!("tcp://{}", addr)))
                    as Box<dyn SampleSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    run_tui(source, settings, simulate)
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn SampleSource>, settings: &Settings, simulate: bool) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, settings);
    if simulate {
        app.toggle_simulator();
    }

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 24;

    while app.running {
        app.pump();
        app.clamp_selection();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(16),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Dashboard => ui::dashboard::render(frame, app, chunks[2]),
                View::Samples => ui::samples::render(frame, app, chunks[2]),
                View::Console => ui::console::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(FRAME_INTERVAL)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                // Terminal will redraw on next iteration
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}

/// Ingest the payload file once and export the resulting state
fn export_to_file(payload_path: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    let source = Box::new(FileSource::new(payload_path));
    let mut app = App::with_theme(source, settings, ui::Theme::dark());
    app.pump();

    if let Some(err) = app.source_error() {
        anyhow::bail!("Failed to read {}: {}", payload_path.display(), err);
    }

    app.export_state(export_path)?;
    println!("Exported telemetry state to: {}", export_path.display());
    Ok(())
}
