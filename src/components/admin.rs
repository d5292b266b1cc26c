use tui_realm_stdlib::{Input, List, Paragraph, Table};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent, State, StateValue,
};

use crate::app::types::{MurderClues, Persona, Room, Theme};

use super::{accent_color, has_focus, Msg, UserEvent};

/// Admin dashboard: the murder clue sets, the persona roster, every room
/// on the server, and room creation.
pub struct Admin {
    outies_panel: Paragraph,
    innies_panel: Paragraph,
    roster_table: Table,
    rooms_list: List,
    create_input: Input,
    hint: Paragraph,
    murder_clues: MurderClues,
    personas: Vec<Persona>,
    rooms: Vec<Room>,
    create_mode: bool,
    theme: Theme,
}

impl MockComponent for Admin {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Length(6),
                tui_layout::Constraint::Min(5),
                tui_layout::Constraint::Length(3),
            ])
            .split(area);

        let clue_chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Horizontal)
            .constraints([
                tui_layout::Constraint::Percentage(50),
                tui_layout::Constraint::Percentage(50),
            ])
            .split(chunks[0]);

        self.outies_panel.view(frame, clue_chunks[0]);
        self.innies_panel.view(frame, clue_chunks[1]);

        let middle_chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Horizontal)
            .constraints([
                tui_layout::Constraint::Percentage(50),
                tui_layout::Constraint::Percentage(50),
            ])
            .split(chunks[1]);

        self.roster_table.view(frame, middle_chunks[0]);
        self.rooms_list.view(frame, middle_chunks[1]);

        if self.create_mode {
            self.create_input.view(frame, chunks[2]);
        } else {
            self.hint.view(frame, chunks[2]);
        }
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.rooms_list.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.rooms_list.attr(attr, value)
    }

    fn state(&self) -> State {
        self.rooms_list.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.rooms_list.perform(cmd)
    }
}

impl Admin {
    pub fn new(
        theme: Theme,
        personas: Vec<Persona>,
        murder_clues: MurderClues,
        rooms: Vec<Room>,
    ) -> Self {
        let mut admin = Self {
            outies_panel: Paragraph::default(),
            innies_panel: Paragraph::default(),
            roster_table: Table::default(),
            rooms_list: List::default(),
            create_input: Self::empty_create_input(theme),
            hint: Self::hint_panel(theme),
            murder_clues,
            personas,
            rooms,
            create_mode: false,
            theme,
        };
        admin.rebuild();
        admin
    }

    fn empty_create_input(theme: Theme) -> Input {
        Input::default()
            .title(
                "New room: enter two player names separated by a space",
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
            .text(&[TextSpan::from(
                "c create room, Enter observe selected room",
            )])
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
    }

    fn clue_panel(&self, title: &str, clues: &[String]) -> Paragraph {
        let lines = if clues.is_empty() {
            vec![TextSpan::from("None")]
        } else {
            clues
                .iter()
                .map(|clue| TextSpan::from(format!("* {clue}")))
                .collect()
        };

        Paragraph::default()
            .title(title, tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(Color::Red),
            )
            .text(&lines)
    }

    fn rebuild(&mut self) {
        self.outies_panel = self.clue_panel("Clues for outies", &self.murder_clues.to_outies);
        self.innies_panel = self.clue_panel("Clues for innies", &self.murder_clues.to_innies);

        let roster_rows = if self.personas.is_empty() {
            vec![vec![TextSpan::from("No personas")]]
        } else {
            self.personas
                .iter()
                .map(|persona| {
                    vec![
                        TextSpan::from(persona.username.as_str()),
                        TextSpan::from(persona.group.as_str()).fg(accent_color(self.theme)),
                        TextSpan::from(persona.description.as_str()),
                    ]
                })
                .collect()
        };

        self.roster_table = Table::default()
            .title("Personas", tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .table(roster_rows);

        let room_rows = if self.rooms.is_empty() {
            vec![vec![TextSpan::from("No rooms yet")]]
        } else {
            self.rooms
                .iter()
                .map(|room| {
                    let created = room.created_at.as_deref().unwrap_or("");
                    vec![
                        TextSpan::from(room.code4.as_str()).fg(accent_color(self.theme)),
                        TextSpan::from(format!(" {} & {} {created}", room.player_a, room.player_b)),
                    ]
                })
                .collect()
        };

        self.rooms_list = List::default()
            .title("Rooms", tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .rows(room_rows)
            .scroll(true)
            .rewind(true)
            .highlighted_color(Color::Gray)
            .selected_line(0);
    }

    fn selected_room(&self) -> Option<&Room> {
        self.rooms.get(self.rooms_list.states.list_index)
    }

    fn create_value(&self) -> String {
        match self.create_input.state() {
            State::One(StateValue::String(value)) => value,
            _ => String::new(),
        }
    }
}

impl Component<Msg, UserEvent> for Admin {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            return match user_event {
                UserEvent::RoomCreated { room } => {
                    if !self.rooms.iter().any(|known| known.code4 == room.code4) {
                        self.rooms.insert(0, room);
                        self.rebuild();
                    }
                    Some(Msg::ReDraw)
                }
                UserEvent::AdminData {
                    personas,
                    murder_clues,
                    rooms,
                } => {
                    self.personas = personas;
                    self.murder_clues = murder_clues;
                    self.rooms = rooms;
                    self.rebuild();
                    Some(Msg::ReDraw)
                }
                _ => None,
            };
        }

        if !has_focus(&self.rooms_list) {
            return None;
        }

        if self.create_mode {
            let cmd = match event {
                Event::Keyboard(KeyEvent {
                    code: Key::Enter,
                    modifiers: KeyModifiers::NONE,
                }) => {
                    let value = self.create_value();
                    let mut players = value.split_whitespace();
                    let player_a = players.next().map(str::to_string);
                    let player_b = players.next().map(str::to_string);

                    return match (player_a, player_b) {
                        (Some(player_a), Some(player_b)) if player_a != player_b => {
                            self.create_mode = false;
                            self.create_input = Self::empty_create_input(self.theme);
                            Some(Msg::CreateRoom { player_a, player_b })
                        }
                        _ => {
                            self.hint = Paragraph::default()
                                .text(&[TextSpan::from("Please select two different players")
                                    .fg(Color::Red)])
                                .borders(
                                    Borders::default()
                                        .modifiers(BorderType::Rounded)
                                        .color(Color::Red),
                                );
                            self.create_mode = false;
                            self.create_input = Self::empty_create_input(self.theme);
                            Some(Msg::ReDraw)
                        }
                    };
                }

                Event::Keyboard(KeyEvent {
                    code: Key::Esc,
                    modifiers: KeyModifiers::NONE,
                }) => {
                    self.create_mode = false;
                    self.create_input = Self::empty_create_input(self.theme);
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

            return match self.create_input.perform(cmd) {
                CmdResult::Changed(_) => Some(Msg::ReDraw),
                _ => None,
            };
        }

        match event {
            Event::Keyboard(KeyEvent {
                code: Key::Char('c'),
                modifiers: KeyModifiers::NONE,
            }) => {
                self.create_mode = true;
                self.hint = Self::hint_panel(self.theme);
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Up,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.rooms_list.perform(Cmd::Move(Direction::Up));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Down,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.rooms_list.perform(Cmd::Move(Direction::Down));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Enter,
                modifiers: KeyModifiers::NONE,
            }) => self
                .selected_room()
                .map(|room| Msg::OpenRoom(room.code4.clone())),

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
