//! Application loop and screen routing.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::map::{MapSdk, MapView, StandInLoader};
use crate::notify::{Notice, Notices, Severity};
use crate::registry::SignalRegistry;
use crate::storage::Storage;

use super::screens::{DashboardScreen, LoginScreen, TripScreen, credentials_valid};

/// How long the loop waits for a key before ticking.
const TICK: Duration = Duration::from_millis(100);

/// Simulated processing latency applied to form submissions.
const SUBMIT_LATENCY: Duration = Duration::from_millis(600);

/// Which screen is currently displayed.
enum Screen {
    Login(LoginScreen),
    Trip(TripScreen),
    Dashboard(DashboardScreen),
}

/// Runs the TUI event loop until the user quits.
pub fn run(storage: &Storage, map_key: Option<String>) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let sdk: Arc<dyn MapSdk> = Arc::new(StandInLoader::new());
    let result = event_loop(&mut terminal, storage, &sdk, map_key);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    storage: &Storage,
    sdk: &Arc<dyn MapSdk>,
    map_key: Option<String>,
) -> io::Result<()> {
    let mut screen = Screen::Login(LoginScreen::new());
    let mut notices = Notices::new();

    loop {
        if let Screen::Dashboard(dashboard) = &mut screen {
            dashboard.tick();
        }
        notices.prune();

        terminal.draw(|frame| {
            match &screen {
                Screen::Login(s) => s.render(frame),
                Screen::Trip(s) => s.render(frame),
                Screen::Dashboard(s) => s.render(frame),
            }
            if let Some(notice) = notices.current() {
                render_notice(frame, notice);
            }
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match &mut screen {
            Screen::Login(login) => match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::Down => login.next_field(),
                KeyCode::BackTab | KeyCode::Up => login.prev_field(),
                KeyCode::Backspace => login.on_backspace(),
                KeyCode::Enter => {
                    if let Some((username, password)) = login.on_enter() {
                        thread::sleep(SUBMIT_LATENCY);
                        if credentials_valid(&username, &password) {
                            notices.post(
                                "Login successful",
                                "Welcome back, Emergency Driver",
                                Severity::Info,
                            );
                            screen = Screen::Trip(TripScreen::new());
                        } else {
                            notices.post(
                                "Login failed",
                                "Invalid credentials. Use driver1/password123",
                                Severity::Error,
                            );
                        }
                    }
                }
                KeyCode::Char(c) => login.on_char(c),
                _ => {}
            },
            Screen::Trip(form) => match key.code {
                KeyCode::Esc => screen = Screen::Login(LoginScreen::new()),
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Backspace => form.on_backspace(),
                KeyCode::Enter => {
                    if let Some(trip) = form.on_enter() {
                        thread::sleep(SUBMIT_LATENCY);
                        storage.save_trip(&trip).map_err(io::Error::other)?;
                        notices.post(
                            "Route calculated",
                            "Traffic signals loaded for your emergency route",
                            Severity::Info,
                        );
                        screen = enter_dashboard(storage, sdk, map_key.clone())
                            .map_err(io::Error::other)?;
                    }
                }
                KeyCode::Char(c) => form.on_char(c),
                _ => {}
            },
            Screen::Dashboard(dashboard) => {
                if dashboard.entering_credential() {
                    match key.code {
                        KeyCode::Esc => dashboard.cancel_credential_entry(),
                        KeyCode::Enter => dashboard.submit_credential(),
                        KeyCode::Backspace => dashboard.credential_backspace(),
                        KeyCode::Char(c) => dashboard.credential_char(c),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Esc | KeyCode::Char('b' | 'n') => {
                            screen = Screen::Trip(TripScreen::new());
                        }
                        KeyCode::Up | KeyCode::Char('k') => dashboard.move_up(),
                        KeyCode::Down | KeyCode::Char('j') => dashboard.move_down(),
                        KeyCode::Enter | KeyCode::Char('o') => {
                            dashboard.override_selected(&mut notices);
                        }
                        KeyCode::Char('a') => dashboard.override_all(&mut notices),
                        KeyCode::Char('i') => dashboard.toggle_info(),
                        KeyCode::Char('m') => dashboard.begin_credential_entry(),
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Dashboard entry: load the stored trip, or route back to the trip
/// form when none is present. No dashboard state is constructed in the
/// redirect case.
fn enter_dashboard(
    storage: &Storage,
    sdk: &Arc<dyn MapSdk>,
    map_key: Option<String>,
) -> crate::storage::Result<Screen> {
    Ok(match storage.load_trip()? {
        Some(trip) => Screen::Dashboard(DashboardScreen::new(
            trip,
            SignalRegistry::with_demo_signals(),
            MapView::new(Arc::clone(sdk)),
            map_key,
        )),
        None => Screen::Trip(TripScreen::new()),
    })
}

/// One-line toast in the top-right corner, over whatever the screen drew.
fn render_notice(frame: &mut Frame, notice: &Notice) {
    let color = match notice.severity {
        Severity::Info => Color::Green,
        Severity::Error => Color::Red,
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", notice.title),
            Style::default().fg(Color::Black).bg(color),
        ),
        Span::styled(
            format!(" {}", notice.description),
            Style::default().fg(color),
        ),
    ]);

    let area = frame.area();
    let strip = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Right),
        strip,
    );
}
