/// Corridor Traffic Monitor
///
/// Shows live traffic metrics from the corridor status feed, falling back to
/// synthetic data when the feed is unavailable. `m` switches between live and
/// mock data, `q` quits.
use std::{error::Error, io, time::Duration};

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use rustls::crypto::ring::default_provider;
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::{error, info, warn};
use traffic_dashboard::{
    Acquisition, DashboardApp, DashboardConfig, LiveSubscriber, MockGenerator, SharedMode,
    SnapshotSource, TransportEnvelope, WsTransport, init_logging, render_dashboard,
};

type Dashboard = Acquisition<WsTransport>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = default_provider().install_default();

    let config = DashboardConfig::default();
    init_logging(&config.log_path)?;
    let endpoint = config.endpoint()?;
    info!("Starting traffic dashboard for {}", endpoint);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mode = SharedMode::default();
    let (subscriber, mut event_rx) = LiveSubscriber::new(
        endpoint.as_str(),
        WsTransport::new(config.connect_timeout),
        mode.clone(),
    );
    let mut acquisition = Acquisition::new(mode.clone(), MockGenerator::new(), subscriber);
    let mut app = DashboardApp::new(mode.get());

    if config.connect_on_startup {
        acquisition.connect_on_startup();
    }

    let res = run_app(
        &mut terminal,
        &mut acquisition,
        &mut app,
        &mut event_rx,
        config.tick_interval,
    )
    .await;

    acquisition.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        live = app.live_count,
        mock = app.mock_count,
        "Traffic dashboard stopped"
    );

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    acquisition: &mut Dashboard,
    app: &mut DashboardApp,
    event_rx: &mut mpsc::UnboundedReceiver<TransportEnvelope>,
    tick_interval: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut input = EventStream::new();

    loop {
        app.sync(acquisition.mode().get(), acquisition.status());

        // A failed frame is logged and retried on the next event
        if let Err(e) = terminal.draw(|f| render_dashboard(f, &*app)) {
            error!("Failed to draw dashboard: {}", e);
        }

        if app.should_quit {
            return Ok(());
        }

        tokio::select! {
            _ = ticker.tick() => {
                if let Some(snapshot) = acquisition.tick() {
                    app.show(SnapshotSource::Mock, &snapshot);
                }
            }
            Some(envelope) = event_rx.recv() => {
                if let Some(snapshot) = acquisition.on_transport_event(envelope) {
                    app.show(SnapshotSource::Live, &snapshot);
                }
            }
            maybe_event = input.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => handle_key(key, acquisition, app),
                Some(Ok(_)) => {
                    // Resize and friends: redraw on the next iteration
                }
                Some(Err(e)) => warn!("Terminal input error: {}", e),
                None => return Ok(()),
            },
        }
    }
}

fn handle_key(key: KeyEvent, acquisition: &Dashboard, app: &mut DashboardApp) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('m') | KeyCode::Char(' ') => {
            app.apply_toggle(acquisition.mode().toggle());
        }
        _ => {}
    }
}
