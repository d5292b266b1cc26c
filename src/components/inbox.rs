use tui_realm_stdlib::{Input, List, Paragraph};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent, State, StateValue,
};

use crate::app::types::{ReceivedDirectMessage, SentDirectMessage, Theme};

use super::{accent_color, has_focus, Msg, UserEvent};

/// Direct messages. Regular users read the one-way notes the admin sent
/// them; admins compose new notes and review what they already sent.
pub struct Inbox {
    message_list: List,
    compose_input: Input,
    hint: Paragraph,
    received: Vec<ReceivedDirectMessage>,
    sent: Vec<SentDirectMessage>,
    is_admin: bool,
    compose_mode: bool,
    theme: Theme,
}

impl MockComponent for Inbox {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let bottom = if self.is_admin { 3 } else { 0 };
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Min(5),
                tui_layout::Constraint::Length(bottom),
            ])
            .split(area);

        self.message_list.view(frame, chunks[0]);

        if self.is_admin {
            if self.compose_mode {
                self.compose_input.view(frame, chunks[1]);
            } else {
                self.hint.view(frame, chunks[1]);
            }
        }
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.message_list.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.message_list.attr(attr, value)
    }

    fn state(&self) -> State {
        self.message_list.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.message_list.perform(cmd)
    }
}

impl Inbox {
    pub fn for_user(theme: Theme, received: Vec<ReceivedDirectMessage>) -> Self {
        let mut inbox = Self {
            message_list: List::default(),
            compose_input: Self::empty_compose_input(theme),
            hint: Self::hint_panel(theme),
            received,
            sent: Vec::new(),
            is_admin: false,
            compose_mode: false,
            theme,
        };
        inbox.rebuild();
        inbox
    }

    pub fn for_admin(theme: Theme, sent: Vec<SentDirectMessage>) -> Self {
        let mut inbox = Self {
            message_list: List::default(),
            compose_input: Self::empty_compose_input(theme),
            hint: Self::hint_panel(theme),
            received: Vec::new(),
            sent,
            is_admin: true,
            compose_mode: false,
            theme,
        };
        inbox.rebuild();
        inbox
    }

    fn empty_compose_input(theme: Theme) -> Input {
        Input::default()
            .title(
                "Compose: recipient followed by the message",
                tui_layout::Alignment::Left,
            )
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .input_type(InputType::Text)
    }

    fn hint_panel(theme: Theme) -> Paragraph {
        Paragraph::default()
            .text(&[TextSpan::from("c compose a new message")])
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
    }

    fn rebuild(&mut self) {
        let rows = if self.is_admin {
            if self.sent.is_empty() {
                vec![vec![TextSpan::from("No messages sent yet")]]
            } else {
                self.sent
                    .iter()
                    .map(|message| {
                        let read_mark = if message.is_read { "read" } else { "unread" };
                        let ts = message.ts.as_deref().unwrap_or("");
                        vec![
                            TextSpan::from(format!("To {}: ", message.user_username))
                                .fg(accent_color(self.theme)),
                            TextSpan::from(message.content.as_str()),
                            TextSpan::from(format!(" [{read_mark}] {ts}")).fg(Color::DarkGray),
                        ]
                    })
                    .collect()
            }
        } else if self.received.is_empty() {
            vec![vec![TextSpan::from("No messages from admin")]]
        } else {
            self.received
                .iter()
                .map(|message| {
                    let ts = message.ts.as_deref().unwrap_or("");
                    vec![
                        TextSpan::from(format!("From {}: ", message.admin_username))
                            .fg(accent_color(self.theme)),
                        TextSpan::from(message.content.as_str()),
                        TextSpan::from(format!(" {ts}")).fg(Color::DarkGray),
                    ]
                })
                .collect()
        };

        let title = if self.is_admin {
            "Sent messages"
        } else {
            "Messages from admin"
        };

        self.message_list = List::default()
            .title(title, tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .rows(rows)
            .scroll(true)
            .rewind(true)
            .highlighted_color(Color::Gray)
            .selected_line(0);
    }

    fn compose_value(&self) -> String {
        match self.compose_input.state() {
            State::One(StateValue::String(value)) => value,
            _ => String::new(),
        }
    }
}

impl Component<Msg, UserEvent> for Inbox {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            return match user_event {
                UserEvent::ReceivedDirectMessages { messages } if !self.is_admin => {
                    self.received = messages;
                    self.rebuild();
                    Some(Msg::ReDraw)
                }
                UserEvent::SentDirectMessages { messages } if self.is_admin => {
                    self.sent = messages;
                    self.rebuild();
                    Some(Msg::ReDraw)
                }
                UserEvent::DirectMessageSent { .. } if self.is_admin => {
                    self.compose_mode = false;
                    self.compose_input = Self::empty_compose_input(self.theme);
                    Some(Msg::ReDraw)
                }
                _ => None,
            };
        }

        if !has_focus(&self.message_list) {
            return None;
        }

        if self.compose_mode {
            let cmd = match event {
                Event::Keyboard(KeyEvent {
                    code: Key::Enter,
                    modifiers: KeyModifiers::NONE,
                }) => {
                    let value = self.compose_value();
                    let mut parts = value.trim().splitn(2, char::is_whitespace);
                    let recipient = parts.next().unwrap_or("").to_string();
                    let content = parts.next().unwrap_or("").trim().to_string();

                    if recipient.is_empty() || content.is_empty() {
                        self.hint = Paragraph::default()
                            .text(&[TextSpan::from("Please select a user and enter a message")
                                .fg(Color::Red)])
                            .borders(
                                Borders::default()
                                    .modifiers(BorderType::Rounded)
                                    .color(Color::Red),
                            );
                        self.compose_mode = false;
                        self.compose_input = Self::empty_compose_input(self.theme);
                        return Some(Msg::ReDraw);
                    }

                    return Some(Msg::SendDirectMessage {
                        user_username: recipient,
                        content,
                    });
                }

                Event::Keyboard(KeyEvent {
                    code: Key::Esc,
                    modifiers: KeyModifiers::NONE,
                }) => {
                    self.compose_mode = false;
                    self.compose_input = Self::empty_compose_input(self.theme);
                    return Some(Msg::ReDraw);
                }

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

            return match self.compose_input.perform(cmd) {
                CmdResult::Changed(_) => Some(Msg::ReDraw),
                _ => None,
            };
        }

        match event {
            Event::Keyboard(KeyEvent {
                code: Key::Char('c'),
                modifiers: KeyModifiers::NONE,
            }) if self.is_admin => {
                self.compose_mode = true;
                self.hint = Self::hint_panel(self.theme);
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Up,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.message_list.perform(Cmd::Move(Direction::Up));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Down,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.message_list.perform(Cmd::Move(Direction::Down));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Tab,
                modifiers: KeyModifiers::NONE,
            }) => Some(Msg::FocusNext),

            Event::Keyboard(KeyEvent {
                code: Key::Esc,
                modifiers: KeyModifiers::NONE,
            }) => Some(Msg::Menu(super::MenuSelection::Home)),

            _ => None,
        }
    }
}
