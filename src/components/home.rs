use tui_realm_stdlib::{Input, Paragraph};
use tuirealm::{
    command::{Cmd, CmdResult},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent, State, StateValue,
};

use crate::app::types::Theme;

use super::{accent_color, has_focus, Msg, UserEvent};

/// Landing screen: join a room by its 4-character code. Saved and recent
/// rooms are one Tab away in the side pane.
pub struct Home {
    code_input: Input,
    error: Option<String>,
    theme: Theme,
}

impl MockComponent for Home {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Length(4),
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Min(1),
            ])
            .split(area);

        let mut welcome = Paragraph::default()
            .text(&[
                TextSpan::from("Join a chat room with another player to exchange information."),
                TextSpan::from("Browse the dossiers to gather material for your investigation."),
            ])
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .title("Welcome", tuirealm::props::Alignment::Left);
        welcome.view(frame, chunks[0]);

        self.code_input.view(frame, chunks[1]);

        if let Some(error) = &self.error {
            let mut error_label = Paragraph::default()
                .text(&[TextSpan::from(error.as_str()).fg(Color::Red)])
                .borders(Borders::default().modifiers(BorderType::Rounded).color(Color::Red));
            error_label.view(frame, chunks[2]);
        }
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.code_input.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.code_input.attr(attr, value)
    }

    fn state(&self) -> State {
        self.code_input.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.code_input.perform(cmd)
    }
}

impl Home {
    pub fn new(theme: Theme) -> Self {
        let code_input = Input::default()
            .title("Enter 4-character room code", tui_layout::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .input_type(InputType::Text);

        Self {
            code_input,
            error: None,
            theme,
        }
    }

    fn code_value(&self) -> String {
        match self.code_input.state() {
            State::One(StateValue::String(value)) => value.trim().to_uppercase(),
            _ => String::new(),
        }
    }
}

impl Component<Msg, UserEvent> for Home {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            if let UserEvent::RoomOpenFailed { reason, .. } = user_event {
                self.error = Some(reason);
                return Some(Msg::ReDraw);
            }
            return None;
        }

        if !has_focus(&self.code_input) {
            return None;
        }

        let cmd = match event {
            Event::Keyboard(KeyEvent {
                code: Key::Enter,
                modifiers: KeyModifiers::NONE,
            }) => {
                let code = self.code_value();
                if code.len() != 4 {
                    self.error = Some("Room code must be 4 characters".to_string());
                    return Some(Msg::ReDraw);
                }
                self.error = None;
                return Some(Msg::OpenRoom(code));
            }

            Event::Keyboard(KeyEvent {
                code: Key::Tab,
                modifiers: KeyModifiers::NONE,
            }) => return Some(Msg::FocusNext),

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
            }) => Cmd::Type(character.to_ascii_uppercase()),

            _ => Cmd::None,
        };

        match self.perform(cmd) {
            CmdResult::Changed(_) => Some(Msg::ReDraw),
            _ => None,
        }
    }
}
