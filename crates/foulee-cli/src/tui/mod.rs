//! Interactive TUI: profile form and 16-week calendar.

pub mod app;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use foulee_core::{PlanService, RequestToken, SubmitOutcome};

use app::{App, PendingRequest};

type Finished = (RequestToken, SubmitOutcome);

/// Launch the interactive calendar.
pub async fn run_calendar(service: PlanService) -> Result<()> {
    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service);
    let cancel = CancellationToken::new();

    let result = run_event_loop(&mut terminal, &mut app, &cancel).await;

    // Drop any request still waiting out its delay.
    cancel.cancel();

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    cancel: &CancellationToken,
) -> Result<()> {
    let tick_rate = app.tick_rate;
    let (tx, mut rx) = mpsc::unbounded_channel::<Finished>();

    loop {
        // Apply results of finished requests.
        while let Ok((token, outcome)) = rx.try_recv() {
            app.apply(token, outcome);
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with a timeout matching the tick rate.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(pending) = app.handle_key(key) {
                    spawn_request(app.service.clone(), pending, cancel.child_token(), tx.clone());
                }
            }
        } else {
            app.on_tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn spawn_request(
    service: PlanService,
    pending: PendingRequest,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<Finished>,
) {
    tokio::spawn(async move {
        let PendingRequest { token, profile } = pending;
        let outcome = service.run(token, profile, service.delay(), &cancel).await;
        // The receiver is gone once the TUI exits.
        let _ = tx.send((token, outcome));
    });
}
