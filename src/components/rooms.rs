use tui_realm_stdlib::{List, Table};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent,
};

use crate::app::types::{SavedRoomEntry, Theme};

use super::{accent_color, has_focus, Msg, UserEvent};

/// Side pane with the user's saved rooms and the bounded recent-rooms
/// history. Saved rooms can be reopened or removed from here; the recent
/// list is display only.
pub struct RoomsPane {
    saved_list: List,
    recent_table: Table,
    saved: Vec<SavedRoomEntry>,
    recent: Vec<SavedRoomEntry>,
    theme: Theme,
}

impl MockComponent for RoomsPane {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Percentage(60),
                tui_layout::Constraint::Percentage(40),
            ])
            .split(area);

        self.saved_list.view(frame, chunks[0]);
        self.recent_table.view(frame, chunks[1]);
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.saved_list.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.saved_list.attr(attr, value)
    }

    fn state(&self) -> tuirealm::State {
        self.saved_list.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.saved_list.perform(cmd)
    }
}

impl RoomsPane {
    pub fn new(theme: Theme) -> Self {
        let mut pane = Self {
            saved_list: List::default(),
            recent_table: Table::default(),
            saved: Vec::new(),
            recent: Vec::new(),
            theme,
        };
        pane.rebuild();
        pane
    }

    fn rebuild(&mut self) {
        let saved_rows = if self.saved.is_empty() {
            vec![vec![TextSpan::from("No saved rooms")]]
        } else {
            self.saved
                .iter()
                .map(|entry| {
                    vec![
                        TextSpan::from(entry.code4.as_str()).fg(accent_color(self.theme)),
                        TextSpan::from(format!(" {} & {}", entry.player_a, entry.player_b)),
                    ]
                })
                .collect()
        };

        self.saved_list = List::default()
            .title("Saved rooms [Enter open, x remove]", tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .rows(saved_rows)
            .scroll(true)
            .rewind(true)
            .highlighted_color(Color::Gray)
            .selected_line(0);

        let recent_rows = if self.recent.is_empty() {
            vec![vec![TextSpan::from("No recent rooms")]]
        } else {
            self.recent
                .iter()
                .map(|entry| {
                    vec![
                        TextSpan::from(entry.code4.as_str()),
                        TextSpan::from(format!(" {} & {}", entry.player_a, entry.player_b)),
                    ]
                })
                .collect()
        };

        self.recent_table = Table::default()
            .title("Recent", tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .table(recent_rows);
    }

    fn selected(&self) -> Option<&SavedRoomEntry> {
        self.saved.get(self.saved_list.states.list_index)
    }
}

impl Component<Msg, UserEvent> for RoomsPane {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            return match user_event {
                UserEvent::SavedRooms { saved, recent } => {
                    self.saved = saved;
                    self.recent = recent;
                    self.rebuild();
                    Some(Msg::ReDraw)
                }
                UserEvent::LoggedOut => {
                    self.saved = Vec::new();
                    self.recent = Vec::new();
                    self.rebuild();
                    Some(Msg::ReDraw)
                }
                _ => None,
            };
        }

        if !has_focus(&self.saved_list) {
            return None;
        }

        match event {
            Event::Keyboard(KeyEvent {
                code: Key::Up,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.saved_list.perform(Cmd::Move(Direction::Up));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Down,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.saved_list.perform(Cmd::Move(Direction::Down));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Enter,
                modifiers: KeyModifiers::NONE,
            }) => self
                .selected()
                .map(|entry| Msg::OpenRoom(entry.code4.clone())),

            Event::Keyboard(KeyEvent {
                code: Key::Char('x'),
                modifiers: KeyModifiers::NONE,
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Delete,
                modifiers: KeyModifiers::NONE,
            }) => self
                .selected()
                .map(|entry| Msg::RemoveSavedRoom(entry.code4.clone())),

            Event::Keyboard(KeyEvent {
                code: Key::Tab,
                modifiers: KeyModifiers::NONE,
            }) => Some(Msg::FocusNext),

            _ => None,
        }
    }
}
