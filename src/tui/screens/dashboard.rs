//! Dashboard screen: signal control, route status, and the map panel.
//!
//! The dashboard owns the signal registry and the map view for the
//! duration of one session. Overrides mutate the registry; the map
//! panel notices the change on the next tick and rebuilds its markers.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, List, ListItem, Padding, Paragraph};

use crate::map::{Bounds, LoadState, MapView, Marker, MarkerKind, project};
use crate::model::{SignalStatus, Trip};
use crate::notify::{Notices, Severity};
use crate::registry::SignalRegistry;

pub struct DashboardScreen {
    trip: Trip,
    registry: SignalRegistry,
    map: MapView,
    selected: usize,
    info_open: bool,
    credential_entry: bool,
    credential_input: String,
    credential_hint: Option<&'static str>,
}

impl DashboardScreen {
    pub fn new(trip: Trip, registry: SignalRegistry, map: MapView, key_prefill: Option<String>) -> Self {
        Self {
            trip,
            registry,
            map,
            selected: 0,
            info_open: false,
            credential_entry: false,
            credential_input: key_prefill.unwrap_or_default(),
            credential_hint: None,
        }
    }

    /// Once per event-loop tick: advance the map load and rebuild
    /// markers if the registry changed since the last sync.
    pub fn tick(&mut self) {
        self.map.poll();
        self.map.sync(&self.registry, &self.trip);
    }

    // ── Signal selection & overrides ──

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.registry.len() {
            self.selected += 1;
        }
    }

    /// Forces the selected signal to green and posts the override
    /// notice. A stale selection id is logged and ignored.
    pub fn override_selected(&mut self, notices: &mut Notices) {
        let Some(signal) = self.registry.signals().get(self.selected) else {
            return;
        };
        let id = signal.id.clone();
        match self.registry.override_to_green(&id) {
            Ok(name) => notices.post(
                "Signal Override Activated",
                format!("{name} changed to GREEN"),
                Severity::Info,
            ),
            Err(e) => tracing::warn!("override ignored: {e}"),
        }
    }

    /// Forces every signal to green and posts one aggregate notice.
    pub fn override_all(&mut self, notices: &mut Notices) {
        self.registry.override_all_to_green();
        notices.post(
            "All Signals Override",
            "All traffic signals set to GREEN",
            Severity::Info,
        );
    }

    pub fn toggle_info(&mut self) {
        self.info_open = !self.info_open;
    }

    // ── Map credential form ──

    pub fn entering_credential(&self) -> bool {
        self.credential_entry
    }

    /// Opens the credential form. From a loaded map this is the
    /// "change credential" action and discards the surface first.
    pub fn begin_credential_entry(&mut self) {
        match self.map.state() {
            LoadState::Loading => {}
            LoadState::Ready(_) => {
                self.map.change_credential();
                self.credential_entry = true;
            }
            LoadState::Idle | LoadState::Failed => {
                self.credential_entry = true;
            }
        }
    }

    pub fn cancel_credential_entry(&mut self) {
        self.credential_entry = false;
        self.credential_hint = None;
    }

    pub fn credential_char(&mut self, c: char) {
        self.credential_hint = None;
        self.credential_input.push(c);
    }

    pub fn credential_backspace(&mut self) {
        self.credential_input.pop();
    }

    /// Submits the typed credential. Rejections stay inside the form —
    /// SDK failures are logged, never surfaced as an error banner.
    pub fn submit_credential(&mut self) {
        match self.map.submit_credential(&self.credential_input) {
            Ok(()) => {
                self.credential_entry = false;
                self.credential_hint = None;
            }
            Err(e) => {
                tracing::warn!("map credential not submitted: {e}");
                self.credential_hint = Some("A non-empty credential is required.");
            }
        }
    }

    #[cfg(test)]
    pub fn map(&self) -> &MapView {
        &self.map
    }

    #[cfg(test)]
    pub fn registry(&self) -> &SignalRegistry {
        &self.registry
    }

    // ── Rendering ──

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(2), // header
            Constraint::Length(2), // route
            Constraint::Min(0),    // main
            Constraint::Length(1), // help
        ])
        .split(area);

        let muted = Style::default().fg(Color::DarkGray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("Signal Control Dashboard", highlight),
            Span::styled("  [Emergency Active]", Style::default().fg(Color::Red)),
        ]))
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(header, chunks[0]);

        let route = Paragraph::new(Line::from(vec![
            Span::styled("From ", muted),
            Span::styled(&self.trip.start_location, Style::default().fg(Color::Gray)),
            Span::styled("  →  To ", muted),
            Span::styled(&self.trip.destination, Style::default().fg(Color::Gray)),
        ]))
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(route, chunks[1]);

        let columns =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(chunks[2]);
        let left = Layout::vertical([Constraint::Length(14), Constraint::Min(0)]).split(columns[0]);
        let right = Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).split(columns[1]);

        self.render_map_panel(frame, left[0]);
        self.render_signal_list(frame, left[1]);
        self.render_route_status(frame, right[0]);
        self.render_quick_actions(frame, right[1]);

        let help_text = if self.credential_entry {
            " ⏎ load map  esc cancel".to_string()
        } else {
            let map_action = match self.map.state() {
                LoadState::Ready(_) => "m change key",
                _ => "m map key",
            };
            format!(" ↑↓ navigate  ⏎ override  a all  i info  {map_action}  n new route  esc back  q quit")
        };
        let help = Paragraph::new(Line::from(Span::styled(help_text, muted)));
        frame.render_widget(help, chunks[3]);
    }

    fn render_map_panel(&self, frame: &mut Frame, area: Rect) {
        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);

        match self.map.state() {
            LoadState::Idle | LoadState::Failed => {
                let mut lines = vec![
                    Line::from(Span::styled("Route Map", normal)),
                    Line::from(Span::styled(
                        "Enter your map API key to view the route and traffic signals.",
                        muted,
                    )),
                    Line::from(""),
                ];
                if self.credential_entry {
                    let mask = "•".repeat(self.credential_input.chars().count());
                    lines.push(Line::from(vec![
                        Span::styled("› ", Style::default().fg(Color::White)),
                        Span::styled(mask, Style::default().fg(Color::White)),
                        Span::styled("█", muted),
                    ]));
                    if let Some(hint) = self.credential_hint {
                        lines.push(Line::from(Span::styled(
                            hint,
                            Style::default().fg(Color::Yellow),
                        )));
                    }
                } else {
                    lines.push(Line::from(Span::styled(
                        "Press m to enter the credential.",
                        muted,
                    )));
                }
                let card =
                    Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
                frame.render_widget(card, area);
            }
            LoadState::Loading => {
                let card = Paragraph::new(vec![
                    Line::from(Span::styled("Route Map", normal)),
                    Line::from(Span::styled("Loading map…", muted)),
                ])
                .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
                frame.render_widget(card, area);
            }
            LoadState::Ready(surface) => {
                let chunks =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);

                let legend = Paragraph::new(Line::from(vec![
                    Span::styled(" ● ", Style::default().fg(Color::Green)),
                    Span::styled("green  ", muted),
                    Span::styled("● ", Style::default().fg(Color::Yellow)),
                    Span::styled("yellow  ", muted),
                    Span::styled("● ", Style::default().fg(Color::Red)),
                    Span::styled("red  ", muted),
                    Span::styled("▲", Style::default().fg(Color::Green)),
                    Span::styled("start  ", muted),
                    Span::styled("▼", Style::default().fg(Color::Red)),
                    Span::styled("destination", muted),
                ]));
                frame.render_widget(legend, chunks[0]);

                render_canvas(frame, chunks[1], surface.markers(), self.selected);

                if self.info_open {
                    self.render_info_popup(frame, chunks[1], surface.markers());
                }
            }
        }
    }

    fn render_info_popup(&self, frame: &mut Frame, area: Rect, markers: &[Marker]) {
        let Some(marker) = markers
            .iter()
            .filter(|m| m.spec.kind == MarkerKind::Signal)
            .nth(self.selected)
        else {
            return;
        };
        let Some(info) = &marker.spec.info else {
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                info.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                info.location.clone(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    info.status_label.clone(),
                    Style::default().fg(hex_color(marker.spec.color)),
                ),
            ]),
        ];

        let width =
            (info.name.len().max(info.location.len()) as u16 + 4).min(area.width.saturating_sub(1));
        let popup = Rect {
            x: area.x + 1,
            y: area.y,
            width,
            height: 5.min(area.height),
        };
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered()),
            popup,
        );
    }

    fn render_signal_list(&self, frame: &mut Frame, area: Rect) {
        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let items: Vec<ListItem> = self
            .registry
            .signals()
            .iter()
            .enumerate()
            .map(|(i, signal)| {
                let style = if i == self.selected { highlight } else { normal };
                let pointer = if i == self.selected { "› " } else { "  " };
                let affordance = if signal.status == SignalStatus::Green {
                    Span::styled("  already green", muted)
                } else {
                    Span::styled("  ⏎ override", muted)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(pointer, style),
                    Span::styled(signal.name.clone(), style),
                    Span::styled(
                        format!("  [{}]", signal.status.label()),
                        Style::default().fg(status_color(signal.status)),
                    ),
                    Span::styled(format!("  {}", signal.location), muted),
                    affordance,
                ]))
            })
            .collect();

        let list = List::new(items).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
        frame.render_widget(list, area);
    }

    fn render_route_status(&self, frame: &mut Frame, area: Rect) {
        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);

        let chunks = Layout::vertical([
            Constraint::Length(2), // title + count
            Constraint::Length(1), // gauge
            Constraint::Length(2), // summary
        ])
        .split(Block::default().padding(Padding::new(2, 2, 1, 0)).inner(area));

        let count = Paragraph::new(vec![
            Line::from(Span::styled("Route Status", normal)),
            Line::from(Span::styled(
                format!(
                    "{} of {} signals green",
                    self.registry.green_count(),
                    self.registry.len()
                ),
                Style::default().fg(Color::White),
            )),
        ]);
        frame.render_widget(count, chunks[0]);

        let completion = self.registry.completion();
        let gauge = Gauge::default()
            .ratio(completion)
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .label(format!("{:.0}%", completion * 100.0));
        frame.render_widget(gauge, chunks[1]);

        let summary = Paragraph::new(Line::from(Span::styled(
            self.registry.status_summary(),
            muted,
        )));
        frame.render_widget(summary, chunks[2]);
    }

    fn render_quick_actions(&self, frame: &mut Frame, area: Rect) {
        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);

        let change_key = match self.map.state() {
            LoadState::Ready(_) => "  m  Change Map Credential",
            _ => "  m  Enter Map Credential",
        };
        let card = Paragraph::new(vec![
            Line::from(Span::styled("Quick Actions", normal)),
            Line::from(Span::styled("  a  Override All Signals", muted)),
            Line::from(Span::styled("  n  Plan New Route", muted)),
            Line::from(Span::styled(change_key, muted)),
        ])
        .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
        frame.render_widget(card, area);
    }
}

/// Draws every marker onto the panel's cell grid.
fn render_canvas(frame: &mut Frame, area: Rect, markers: &[Marker], selected: usize) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let Some(bounds) = Bounds::around(markers.iter().map(|m| m.spec.position)) else {
        return;
    };

    let width = area.width as usize;
    let height = area.height as usize;
    let mut grid: Vec<Vec<Option<Span>>> = vec![vec![None; width]; height];

    let mut signal_ordinal = 0;
    for marker in markers {
        let (col, row) = project(marker.spec.position, &bounds, area.width, area.height);
        let glyph = match marker.spec.kind {
            MarkerKind::Signal => "●",
            MarkerKind::RouteStart => "▲",
            MarkerKind::RouteEnd => "▼",
        };
        let mut style = Style::default().fg(hex_color(marker.spec.color));
        if marker.spec.kind == MarkerKind::Signal {
            if signal_ordinal == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            signal_ordinal += 1;
        }
        grid[row as usize][col as usize] = Some(Span::styled(glyph, style));
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| cell.unwrap_or_else(|| Span::raw(" ")))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Terminal color for a marker hex fill.
fn hex_color(hex: &str) -> Color {
    match hex {
        "#22c55e" | "#10b981" => Color::Green,
        "#eab308" => Color::Yellow,
        "#ef4444" | "#dc2626" => Color::Red,
        _ => Color::White,
    }
}

fn status_color(status: SignalStatus) -> Color {
    match status {
        SignalStatus::Green => Color::Green,
        SignalStatus::Yellow => Color::Yellow,
        SignalStatus::Red => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::map::{MapError, MapOptions, MapSdk, MapSurface};

    struct InstantSdk;

    impl MapSdk for InstantSdk {
        fn initialize(&self, _key: &str, options: &MapOptions) -> Result<MapSurface, MapError> {
            Ok(MapSurface::new(options.clone()))
        }
    }

    fn sample_dashboard() -> DashboardScreen {
        DashboardScreen::new(
            Trip {
                start_location: "City Hospital".into(),
                destination: "Trauma Center".into(),
            },
            SignalRegistry::with_demo_signals(),
            MapView::new(Arc::new(InstantSdk)),
            None,
        )
    }

    fn settle(dashboard: &mut DashboardScreen) {
        for _ in 0..200 {
            dashboard.tick();
            if !dashboard.map().is_loading() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("map load never settled");
    }

    #[test]
    fn selection_stays_within_the_registry() {
        let mut dashboard = sample_dashboard();

        dashboard.move_up();
        assert_eq!(dashboard.selected, 0);

        for _ in 0..10 {
            dashboard.move_down();
        }
        assert_eq!(dashboard.selected, dashboard.registry().len() - 1);
    }

    #[test]
    fn override_selected_posts_the_signal_name() {
        let mut dashboard = sample_dashboard();
        let mut notices = Notices::new();

        dashboard.move_down();
        dashboard.override_selected(&mut notices);

        let notice = notices.current().unwrap();
        assert_eq!(notice.title, "Signal Override Activated");
        assert!(notice.description.contains("Signal 2 - Central Plaza"));
        assert_eq!(
            dashboard.registry().signals()[1].status,
            SignalStatus::Green
        );
    }

    #[test]
    fn override_all_posts_one_aggregate_notice() {
        let mut dashboard = sample_dashboard();
        let mut notices = Notices::new();

        dashboard.override_all(&mut notices);

        assert_eq!(notices.current().unwrap().title, "All Signals Override");
        assert_eq!(
            dashboard.registry().green_count(),
            dashboard.registry().len()
        );
    }

    #[test]
    fn credential_flow_loads_the_map_and_places_markers() {
        let mut dashboard = sample_dashboard();

        dashboard.begin_credential_entry();
        assert!(dashboard.entering_credential());
        for c in "demo-key".chars() {
            dashboard.credential_char(c);
        }
        dashboard.submit_credential();
        assert!(!dashboard.entering_credential());

        settle(&mut dashboard);

        let markers = dashboard.map().surface().unwrap().markers();
        assert_eq!(markers.len(), dashboard.registry().len() + 2);
    }

    #[test]
    fn blank_credential_stays_in_the_form() {
        let mut dashboard = sample_dashboard();

        dashboard.begin_credential_entry();
        dashboard.submit_credential();

        assert!(dashboard.entering_credential());
        assert!(dashboard.credential_hint.is_some());
    }

    #[test]
    fn changing_credential_discards_the_loaded_surface() {
        let mut dashboard = sample_dashboard();
        dashboard.begin_credential_entry();
        for c in "demo-key".chars() {
            dashboard.credential_char(c);
        }
        dashboard.submit_credential();
        settle(&mut dashboard);
        assert!(dashboard.map().surface().is_some());

        dashboard.begin_credential_entry();

        assert!(dashboard.entering_credential());
        assert!(dashboard.map().surface().is_none());
    }

    #[test]
    fn override_after_load_rebuilds_markers_without_duplicates() {
        let mut dashboard = sample_dashboard();
        dashboard.begin_credential_entry();
        for c in "demo-key".chars() {
            dashboard.credential_char(c);
        }
        dashboard.submit_credential();
        settle(&mut dashboard);

        let mut notices = Notices::new();
        dashboard.override_all(&mut notices);
        dashboard.tick();

        let markers = dashboard.map().surface().unwrap().markers();
        assert_eq!(markers.len(), dashboard.registry().len() + 2);
        let green_signals = markers
            .iter()
            .filter(|m| {
                m.spec.kind == MarkerKind::Signal
                    && m.spec.color == SignalStatus::Green.color_hex()
            })
            .count();
        assert_eq!(green_signals, dashboard.registry().len());
    }

    #[test]
    fn key_prefill_lands_in_the_credential_input() {
        let dashboard = DashboardScreen::new(
            Trip {
                start_location: "A".into(),
                destination: "B".into(),
            },
            SignalRegistry::with_demo_signals(),
            MapView::new(Arc::new(InstantSdk)),
            Some("configured-key".into()),
        );

        assert_eq!(dashboard.credential_input, "configured-key");
    }
}
