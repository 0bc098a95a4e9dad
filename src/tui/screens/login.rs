//! Login screen: demo credential gate.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

/// The hardcoded demo account.
pub const DEMO_USERNAME: &str = "driver1";
pub const DEMO_PASSWORD: &str = "password123";

/// The credential check: a string comparison, nothing more.
pub fn credentials_valid(username: &str, password: &str) -> bool {
    username == DEMO_USERNAME && password == DEMO_PASSWORD
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

pub struct LoginScreen {
    username: String,
    password: String,
    focus: Field,
    hint: Option<&'static str>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: Field::Username,
            hint: None,
        }
    }

    pub fn on_char(&mut self, c: char) {
        self.hint = None;
        match self.focus {
            Field::Username => self.username.push(c),
            Field::Password => self.password.push(c),
        }
    }

    pub fn on_backspace(&mut self) {
        match self.focus {
            Field::Username => {
                self.username.pop();
            }
            Field::Password => {
                self.password.pop();
            }
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }

    pub fn prev_field(&mut self) {
        self.next_field();
    }

    /// Handle Enter. On the username field, moves focus on; on the
    /// password field, submits. Returns the credential pair once both
    /// fields are filled.
    pub fn on_enter(&mut self) -> Option<(String, String)> {
        if self.focus == Field::Username {
            self.focus = Field::Password;
            return None;
        }
        if self.username.is_empty() || self.password.is_empty() {
            self.hint = Some("Enter a username and password.");
            return None;
        }
        Some((self.username.clone(), self.password.clone()))
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(4), // title
            Constraint::Length(3), // username
            Constraint::Length(3), // password
            Constraint::Length(2), // hint
            Constraint::Min(0),    // demo credentials card
            Constraint::Length(1), // help
        ])
        .split(area);

        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let title = Paragraph::new(vec![
            Line::from(Span::styled("Emergency Response", highlight)),
            Line::from(Span::styled("Ambulance Driver Portal", muted)),
        ])
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(title, chunks[0]);

        render_field(
            frame,
            chunks[1],
            "Username",
            &self.username,
            self.focus == Field::Username,
        );
        let masked = "•".repeat(self.password.chars().count());
        render_field(
            frame,
            chunks[2],
            "Password",
            &masked,
            self.focus == Field::Password,
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
            Line::from(Span::styled("Demo Credentials", normal)),
            Line::from(Span::styled(format!("  Username: {DEMO_USERNAME}"), muted)),
            Line::from(Span::styled(format!("  Password: {DEMO_PASSWORD}"), muted)),
        ])
        .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
        frame.render_widget(card, chunks[4]);

        let help = Paragraph::new(Line::from(Span::styled(
            " tab switch field  ⏎ sign in  esc quit",
            muted,
        )));
        frame.render_widget(help, chunks[5]);
    }
}

/// A labeled single-line input with a block cursor when focused.
fn render_field(frame: &mut Frame, area: ratatui::layout::Rect, label: &str, value: &str, focused: bool) {
    let muted = Style::default().fg(Color::DarkGray);
    let style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let pointer = if focused { "› " } else { "  " };

    let mut input = vec![
        Span::styled(pointer, style),
        Span::styled(value.to_string(), style),
    ];
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

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(screen: &mut LoginScreen, s: &str) {
        for c in s.chars() {
            screen.on_char(c);
        }
    }

    #[test]
    fn demo_pair_is_the_only_valid_credential() {
        assert!(credentials_valid("driver1", "password123"));
        assert!(!credentials_valid("driver1", "wrong"));
        assert!(!credentials_valid("admin", "password123"));
        assert!(!credentials_valid("", ""));
    }

    #[test]
    fn full_flow_produces_the_typed_pair() {
        let mut screen = LoginScreen::new();

        type_str(&mut screen, "driver1");
        assert!(screen.on_enter().is_none()); // Moves focus to password.
        type_str(&mut screen, "password123");

        let (username, password) = screen.on_enter().unwrap();
        assert_eq!(username, "driver1");
        assert_eq!(password, "password123");
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut screen = LoginScreen::new();

        assert!(screen.on_enter().is_none()); // Username → password focus.
        assert!(screen.on_enter().is_none()); // Both empty: rejected.
    }

    #[test]
    fn backspace_edits_the_focused_field() {
        let mut screen = LoginScreen::new();
        type_str(&mut screen, "driver12");
        screen.on_backspace();
        screen.on_enter();
        type_str(&mut screen, "password123");

        let (username, _) = screen.on_enter().unwrap();
        assert_eq!(username, "driver1");
    }
}
