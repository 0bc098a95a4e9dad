//! Trip planning screen: start and destination for the emergency route.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::model::Trip;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    Destination,
}

pub struct TripScreen {
    start_location: String,
    destination: String,
    focus: Field,
    hint: Option<&'static str>,
}

impl TripScreen {
    pub fn new() -> Self {
        Self {
            start_location: String::new(),
            destination: String::new(),
            focus: Field::Start,
            hint: None,
        }
    }

    pub fn on_char(&mut self, c: char) {
        self.hint = None;
        match self.focus {
            Field::Start => self.start_location.push(c),
            Field::Destination => self.destination.push(c),
        }
    }

    pub fn on_backspace(&mut self) {
        match self.focus {
            Field::Start => {
                self.start_location.pop();
            }
            Field::Destination => {
                self.destination.pop();
            }
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            Field::Start => Field::Destination,
            Field::Destination => Field::Start,
        };
    }

    pub fn prev_field(&mut self) {
        self.next_field();
    }

    /// Handle Enter. On the start field, moves focus on; on the
    /// destination field, submits. Both fields must be non-empty before
    /// a trip is produced.
    pub fn on_enter(&mut self) -> Option<Trip> {
        if self.focus == Field::Start {
            self.focus = Field::Destination;
            return None;
        }
        let start = self.start_location.trim();
        let destination = self.destination.trim();
        if start.is_empty() || destination.is_empty() {
            self.hint = Some("Both locations are required.");
            return None;
        }
        Some(Trip {
            start_location: start.to_string(),
            destination: destination.to_string(),
        })
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(4), // title
            Constraint::Length(3), // start
            Constraint::Length(3), // destination
            Constraint::Length(2), // hint
            Constraint::Min(0),    // examples card
            Constraint::Length(1), // help
        ])
        .split(area);

        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let title = Paragraph::new(vec![
            Line::from(Span::styled("Plan Emergency Route", highlight)),
            Line::from(Span::styled(
                "Enter your route details to access traffic signal controls",
                muted,
            )),
        ])
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(title, chunks[0]);

        render_field(
            frame,
            chunks[1],
            "Start Location",
            &self.start_location,
            "e.g., City Hospital Emergency Department",
            self.focus == Field::Start,
        );
        render_field(
            frame,
            chunks[2],
            "Destination Location",
            &self.destination,
            "e.g., Downtown Medical Center",
            self.focus == Field::Destination,
        );

        if let Some(hint) = self.hint {
            let warn = Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::Yellow),
            )))
            .block(Block::default().padding(Padding::new(2, 0, 0, 0)));
            frame.render_widget(warn, chunks[3]);
        }

        let card = Paragraph::new(vec![
            Line::from(Span::styled("Quick Examples", normal)),
            Line::from(Span::styled(
                "  City Hospital → Downtown Medical Center",
                muted,
            )),
            Line::from(Span::styled(
                "  Emergency Station 5 → Regional Trauma Center",
                muted,
            )),
            Line::from(Span::styled("  Ambulance Base → University Hospital", muted)),
        ])
        .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
        frame.render_widget(card, chunks[4]);

        let help = Paragraph::new(Line::from(Span::styled(
            " tab switch field  ⏎ start emergency route  esc logout",
            muted,
        )));
        frame.render_widget(help, chunks[5]);
    }
}

fn render_field(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let muted = Style::default().fg(Color::DarkGray);
    let style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let pointer = if focused { "› " } else { "  " };

    let mut input = vec![Span::styled(pointer, style)];
    if value.is_empty() && !focused {
        input.push(Span::styled(placeholder.to_string(), muted));
    } else {
        input.push(Span::styled(value.to_string(), style));
    }
    if focused {
        input.push(Span::styled("█", muted));
    }

    let field = Paragraph::new(vec![
        Line::from(Span::styled(label.to_string(), muted)),
        Line::from(input),
    ])
    .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(field, area);
}
