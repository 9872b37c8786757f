mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::keys::KeyOutcome;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{AppEvent, NetworkRequest, NetworkResponse};
use crate::state::network::NetworkWorker;
use crate::state::refresher::PollHandle;
use arb_api::client::ArbApi;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

const INPUT_POLL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load()?;

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    let level = settings.log_level.unwrap_or(LevelFilter::Warn);
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);

    setup_panic_hook();
    setup_terminal()?;

    let client = ArbApi::with_base_url(settings.api_url.clone()).timeout(settings.timeout());
    info!("scores proxy at {}", client.base_url());
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (app_event_tx, app_event_rx) = mpsc::channel::<AppEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_tx = app_event_tx.clone();
    let input_handler = tokio::task::spawn_blocking(move || input_handler_task(input_tx));

    // Scoreboard pollers; feed pollers start once the followed game is found
    let board_schedule = app.lock().await.board_schedule();
    let board_poller = PollHandle::spawn(board_schedule, app_event_tx.clone());

    // Network thread, torn down with the scoreboard context
    let network_worker =
        NetworkWorker::new(client, network_req_rx, network_resp_tx, board_poller.cancel_token());
    let network_task = tokio::spawn(network_worker.run());

    // SIGINT outside raw mode
    let signal_tx = app_event_tx.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(AppEvent::Shutdown).await;
        }
    });

    let _ = app_event_tx.send(AppEvent::Started).await;

    main_loop(terminal, app, app_event_tx, app_event_rx, network_req_tx, network_resp_rx).await;

    board_poller.join().await;
    let _ = network_task.await;
    signal_task.abort();
    let _ = input_handler.await;
    cleanup_terminal();

    Ok(())
}

async fn main_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    app_events_tx: mpsc::Sender<AppEvent>,
    mut app_events: mpsc::Receiver<AppEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut feed_poller: Option<PollHandle> = None;

    loop {
        let requests = tokio::select! {
            Some(event) = app_events.recv() => {
                let mut guard = app.lock().await;
                match event {
                    AppEvent::Started => guard.startup_requests(),
                    AppEvent::PollTick(source) => guard.on_tick(source),
                    AppEvent::KeyPressed(key_event) => {
                        if keys::handle_key_bindings(key_event, &mut guard) == KeyOutcome::Quit {
                            info!("quit requested");
                            break;
                        }
                        Vec::new()
                    }
                    AppEvent::Resize => Vec::new(),
                    AppEvent::Shutdown => {
                        info!("shutting down");
                        break;
                    }
                }
            }

            Some(response) = network_responses.recv() => {
                app.lock().await.on_network_response(response)
            }

            else => break,
        };

        for request in requests {
            if let Err(e) = network_requests.send(request).await {
                error!("Failed to send network request: {e}");
                return;
            }
        }

        let mut guard = app.lock().await;
        if feed_poller.is_none() && guard.is_feed_active() {
            let poller = PollHandle::spawn(guard.feed_schedule(), app_events_tx.clone());
            info!("started {} feed pollers", poller.len());
            feed_poller = Some(poller);
        }
        draw::draw(&mut terminal, &mut guard);
    }

    if let Some(poller) = feed_poller {
        poller.join().await;
    }
}

/// Blocking reader for terminal events. Polls with a timeout so it notices
/// the main loop going away.
fn input_handler_task(app_events: mpsc::Sender<AppEvent>) {
    while !app_events.is_closed() {
        match crossterm_event::poll(INPUT_POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                error!("terminal input failed: {e}");
                return;
            }
        }
        let app_event = match crossterm_event::read() {
            Ok(Event::Key(key_event)) => AppEvent::KeyPressed(key_event),
            Ok(Event::Resize(_, _)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(e) => {
                error!("terminal input failed: {e}");
                return;
            }
        };
        if app_events.blocking_send(app_event).is_err() {
            return;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    )?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
