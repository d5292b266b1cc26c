use tui_realm_stdlib::{Input, Paragraph};
use tuirealm::{
    command::{Cmd, CmdResult},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent, State, StateValue,
};

use crate::app::types::Theme;

use super::{accent_color, Msg, UserEvent};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Field {
    Username,
    Password,
}

/// Credentials form shown until a session exists.
pub struct Login {
    username_input: Input,
    password_input: Input,
    active_field: Field,
    error: Option<String>,
    submitting: bool,
    theme: Theme,
}

impl MockComponent for Login {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Min(1),
            ])
            .split(area);

        let mut banner = Paragraph::default()
            .text(&[TextSpan::from("Log in to continue your investigation")])
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            );
        banner.view(frame, chunks[0]);

        self.username_input.view(frame, chunks[1]);
        self.password_input.view(frame, chunks[2]);

        if let Some(error) = &self.error {
            let mut error_label = Paragraph::default()
                .text(&[TextSpan::from(error.as_str()).fg(Color::Red)])
                .borders(Borders::default().modifiers(BorderType::Rounded).color(Color::Red));
            error_label.view(frame, chunks[3]);
        }
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.username_input.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.username_input.attr(attr, value)
    }

    fn state(&self) -> State {
        self.username_input.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        match self.active_field {
            Field::Username => self.username_input.perform(cmd),
            Field::Password => self.password_input.perform(cmd),
        }
    }
}

impl Login {
    pub fn new(theme: Theme) -> Self {
        let username_input = Input::default()
            .title("Username", tui_layout::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .input_type(InputType::Text);

        let password_input = Input::default()
            .title("Password", tui_layout::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .input_type(InputType::Password('*'));

        Self {
            username_input,
            password_input,
            active_field: Field::Username,
            error: None,
            submitting: false,
            theme,
        }
    }

    fn field_value(input: &Input) -> String {
        match input.state() {
            State::One(StateValue::String(value)) => value,
            _ => String::new(),
        }
    }
}

impl Component<Msg, UserEvent> for Login {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            if let UserEvent::LoginFailed { reason } = user_event {
                self.submitting = false;
                self.error = Some(reason);
                return Some(Msg::ReDraw);
            }
            return None;
        }

        let cmd = match event {
            Event::Keyboard(KeyEvent {
                code: Key::Tab | Key::Down,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.active_field = match self.active_field {
                    Field::Username => Field::Password,
                    Field::Password => Field::Username,
                };
                return Some(Msg::ReDraw);
            }

            Event::Keyboard(KeyEvent {
                code: Key::Up,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.active_field = Field::Username;
                return Some(Msg::ReDraw);
            }

            Event::Keyboard(KeyEvent {
                code: Key::Enter,
                modifiers: KeyModifiers::NONE,
            }) => {
                if self.active_field == Field::Username {
                    self.active_field = Field::Password;
                    return Some(Msg::ReDraw);
                }

                if self.submitting {
                    return None;
                }

                let username = Self::field_value(&self.username_input);
                let password = Self::field_value(&self.password_input);
                if username.trim().is_empty() || password.is_empty() {
                    self.error = Some("Enter a username and a password".to_string());
                    return Some(Msg::ReDraw);
                }

                self.submitting = true;
                self.error = None;
                return Some(Msg::SubmitLogin {
                    username: username.trim().to_string(),
                    password,
                });
            }

            Event::Keyboard(KeyEvent {
                code: Key::Esc,
                modifiers: KeyModifiers::NONE,
            }) => return Some(Msg::AppClose),

            Event::Keyboard(KeyEvent {
                code: Key::Left,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Move(tuirealm::command::Direction::Left),

            Event::Keyboard(KeyEvent {
                code: Key::Right,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Move(tuirealm::command::Direction::Right),

            Event::Keyboard(KeyEvent {
                code: Key::Backspace | Key::Delete,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Delete,

            Event::Keyboard(KeyEvent {
                code: Key::Char(character),
                modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            }) => Cmd::Type(character),

            _ => Cmd::None,
        };

        match self.perform(cmd) {
            CmdResult::Changed(_) => Some(Msg::ReDraw),
            _ => None,
        }
    }
}
