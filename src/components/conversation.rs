use std::collections::HashSet;

use tui_realm_stdlib::{Input, List};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent, State, StateValue,
};

use crate::app::types::{Message, Room, Theme};

use super::{accent_color, has_focus, Msg, UserEvent};

/// One open room: the merged message sequence plus the send box.
///
/// The network thread owns the merge; this component renders whatever it
/// is told was accepted, keeping its own id set so a redelivered batch
/// cannot produce duplicate rows.
pub struct Conversation {
    message_list: List,
    input: Input,
    room: Room,
    username: String,
    messages: Vec<Message>,
    seen: HashSet<i64>,
    sending: bool,
    theme: Theme,
}

impl MockComponent for Conversation {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Min(5),
                tui_layout::Constraint::Length(3),
            ])
            .split(area);

        self.message_list.view(frame, chunks[0]);
        self.input.view(frame, chunks[1]);
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.input.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.input.attr(attr, value)
    }

    fn state(&self) -> State {
        self.input.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.input.perform(cmd)
    }
}

impl Conversation {
    pub fn new(theme: Theme, username: String, room: Room, messages: Vec<Message>) -> Self {
        let seen = messages.iter().map(|message| message.id).collect();

        let mut conversation = Self {
            message_list: List::default(),
            input: Self::empty_input(theme),
            room,
            username,
            messages,
            seen,
            sending: false,
            theme,
        };
        conversation.rebuild_list();
        conversation
    }

    fn empty_input(theme: Theme) -> Input {
        Input::default()
            .title("Type your message", tui_layout::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .input_type(InputType::Text)
    }

    fn title(&self) -> String {
        if self.username == self.room.player_a || self.username == self.room.player_b {
            format!(
                "Room {} [chatting with {}]",
                self.room.code4,
                self.room.other_player(&self.username)
            )
        } else {
            format!(
                "Room {} [observing {} & {}]",
                self.room.code4, self.room.player_a, self.room.player_b
            )
        }
    }

    fn rebuild_list(&mut self) {
        let rows = if self.messages.is_empty() {
            vec![vec![TextSpan::from(
                "No messages yet. Start the conversation!",
            )]]
        } else {
            self.messages
                .iter()
                .map(|message| {
                    let sender_color = if message.sender == self.username {
                        accent_color(self.theme)
                    } else {
                        Color::Reset
                    };
                    vec![
                        TextSpan::from(format!("{}: ", message.sender)).fg(sender_color),
                        TextSpan::from(message.content.as_str()),
                    ]
                })
                .collect()
        };

        let selected = rows.len().saturating_sub(1);
        self.message_list = List::default()
            .title(self.title(), tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .rows(rows)
            .scroll(true)
            .rewind(false)
            .highlighted_color(Color::Gray)
            .selected_line(selected);
    }

    fn append(&mut self, batch: Vec<Message>) {
        let mut changed = false;
        for message in batch {
            if self.seen.insert(message.id) {
                self.messages.push(message);
                changed = true;
            }
        }
        if changed {
            self.rebuild_list();
        }
    }

    fn input_value(&self) -> String {
        match self.input.state() {
            State::One(StateValue::String(value)) => value,
            _ => String::new(),
        }
    }
}

impl Component<Msg, UserEvent> for Conversation {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            return match user_event {
                UserEvent::NewMessages { code4, messages } if code4 == self.room.code4 => {
                    self.append(messages);
                    Some(Msg::ReDraw)
                }
                UserEvent::MessageSent {
                    code4,
                    message,
                    appended,
                } if code4 == self.room.code4 => {
                    if appended {
                        self.append(vec![message]);
                    }
                    self.sending = false;
                    self.input = Self::empty_input(self.theme);
                    Some(Msg::ReDraw)
                }
                UserEvent::SendRejected { code4, .. } if code4 == self.room.code4 => {
                    // Keep the typed content so it can be resubmitted.
                    self.sending = false;
                    Some(Msg::ReDraw)
                }
                _ => None,
            };
        }

        if !has_focus(&self.input) {
            return None;
        }

        let cmd = match event {
            Event::Keyboard(KeyEvent {
                code: Key::Enter,
                modifiers: KeyModifiers::NONE,
            }) => {
                let content = self.input_value();
                if self.sending || content.trim().is_empty() {
                    return None;
                }
                self.sending = true;
                return Some(Msg::SendChatMessage {
                    code4: self.room.code4.clone(),
                    content,
                });
            }

            Event::Keyboard(KeyEvent {
                code: Key::Esc,
                modifiers: KeyModifiers::NONE,
            }) => return Some(Msg::LeaveRoom),

            Event::Keyboard(KeyEvent {
                code: Key::Tab,
                modifiers: KeyModifiers::NONE,
            }) => return Some(Msg::FocusNext),

            Event::Keyboard(KeyEvent {
                code: Key::PageUp,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.message_list.perform(Cmd::Scroll(Direction::Up));
                return Some(Msg::ReDraw);
            }

            Event::Keyboard(KeyEvent {
                code: Key::PageDown,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.message_list.perform(Cmd::Scroll(Direction::Down));
                return Some(Msg::ReDraw);
            }

            Event::Keyboard(KeyEvent {
                code: Key::Left,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Move(Direction::Left),

            Event::Keyboard(KeyEvent {
                code: Key::Right,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Move(Direction::Right),

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
