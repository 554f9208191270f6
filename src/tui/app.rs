//! Application loop, refresh tick, and key routing.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::meter::Meter;
use crate::model::Phase;
use crate::storage::Storage;

use super::screens::{HistoryScreen, MeterScreen};

/// How often the meter screen refreshes while a trip is running.
const TICK: Duration = Duration::from_millis(500);

/// Which screen is currently displayed.
enum Screen {
    Meter,
    History(HistoryScreen),
}

/// Runs the TUI until the user quits.
///
/// Returns the ticket of every trip finished during the session, for
/// printing once the terminal is restored.
pub fn run(storage: &Storage) -> io::Result<Vec<String>> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, storage);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, storage: &Storage) -> io::Result<Vec<String>> {
    let mut meter = Meter::new();
    let mut meter_screen = MeterScreen::new();
    let mut screen = Screen::Meter;
    let mut tickets: Vec<String> = Vec::new();

    loop {
        let reading = meter.observe(Instant::now());
        terminal.draw(|frame| match &screen {
            Screen::Meter => meter_screen.render(frame, &reading),
            Screen::History(s) => s.render(frame),
        })?;

        // While a trip runs, wait at most one tick so the totals re-render;
        // otherwise block until the next key. Finishing the trip is what
        // stops the periodic refresh.
        if meter.is_active() && !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match &mut screen {
                Screen::Meter => match key.code {
                    KeyCode::Char('q') => return Ok(tickets),
                    KeyCode::Char('s') => match meter.start(Instant::now()) {
                        Ok(()) => meter_screen.trip_started(),
                        Err(e) => meter_screen.show_error(e.to_string()),
                    },
                    KeyCode::Char('t') => {
                        match meter.transition(Phase::Stopped, Instant::now()) {
                            Ok(()) => meter_screen.clear_notice(),
                            Err(e) => meter_screen.show_error(e.to_string()),
                        }
                    }
                    KeyCode::Char('m') => {
                        match meter.transition(Phase::Moving, Instant::now()) {
                            Ok(()) => meter_screen.clear_notice(),
                            Err(e) => meter_screen.show_error(e.to_string()),
                        }
                    }
                    KeyCode::Char('f') => {
                        match meter.finish(Instant::now(), jiff::Zoned::now().datetime()) {
                            Ok(record) => {
                                let ticket = record.ticket();
                                meter_screen.show_ticket(ticket.clone());
                                tickets.push(ticket);
                                // The trip is already closed; a failed insert
                                // must not take the numbers down with it.
                                if let Err(e) = storage.insert_trip(&record) {
                                    meter_screen.show_error(format!(
                                        "trip finished but not recorded: {e}"
                                    ));
                                }
                            }
                            Err(e) => meter_screen.show_error(e.to_string()),
                        }
                    }
                    KeyCode::Char('h') => match storage.list_trips() {
                        Ok(records) => screen = Screen::History(HistoryScreen::new(records)),
                        Err(e) => {
                            meter_screen.show_error(format!("failed to load history: {e}"));
                        }
                    },
                    _ => {}
                },
                Screen::History(history) => match key.code {
                    KeyCode::Char('q') => return Ok(tickets),
                    KeyCode::Esc | KeyCode::Char('h') => screen = Screen::Meter,
                    KeyCode::Up | KeyCode::Char('k') => history.scroll_up(),
                    KeyCode::Down | KeyCode::Char('j') => history.scroll_down(),
                    _ => {}
                },
            }
        }
    }
}
