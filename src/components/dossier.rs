use std::collections::BTreeMap;

use tui_realm_stdlib::{Input, List, Paragraph};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    Component, Event, MockComponent, State, StateValue,
};

use crate::app::types::{Persona, PersonaAnnotation, Theme};

use super::{accent_color, Msg, UserEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupFilter {
    All,
    Outies,
    Innies,
}

impl GroupFilter {
    fn label(self) -> &'static str {
        match self {
            GroupFilter::All => "All",
            GroupFilter::Outies => "Outies",
            GroupFilter::Innies => "Innies",
        }
    }

    fn next(self) -> Self {
        match self {
            GroupFilter::All => GroupFilter::Outies,
            GroupFilter::Outies => GroupFilter::Innies,
            GroupFilter::Innies => GroupFilter::All,
        }
    }

    fn previous(self) -> Self {
        match self {
            GroupFilter::All => GroupFilter::Innies,
            GroupFilter::Outies => GroupFilter::All,
            GroupFilter::Innies => GroupFilter::Outies,
        }
    }

    fn matches(self, persona: &Persona) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Outies => persona.group == "outie",
            GroupFilter::Innies => persona.group == "innie",
        }
    }
}

/// Character dossiers plus the caller's clues. Personas can be struck,
/// highlighted or annotated with a note; the markup stays on this machine.
pub struct Dossiers {
    persona_list: List,
    clues_panel: Paragraph,
    note_input: Input,
    personas: Vec<Persona>,
    clues: Vec<String>,
    annotations: BTreeMap<String, PersonaAnnotation>,
    filter: GroupFilter,
    note_mode: bool,
    theme: Theme,
}

impl MockComponent for Dossiers {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let note_height = if self.note_mode { 3 } else { 0 };
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .constraints([
                tui_layout::Constraint::Length(5),
                tui_layout::Constraint::Min(5),
                tui_layout::Constraint::Length(note_height),
            ])
            .split(area);

        self.clues_panel.view(frame, chunks[0]);
        self.persona_list.view(frame, chunks[1]);
        if self.note_mode {
            self.note_input.view(frame, chunks[2]);
        }
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.persona_list.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.persona_list.attr(attr, value)
    }

    fn state(&self) -> State {
        self.persona_list.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.persona_list.perform(cmd)
    }
}

impl Dossiers {
    pub fn new(
        theme: Theme,
        personas: Vec<Persona>,
        clues: Vec<String>,
        annotations: Vec<(String, PersonaAnnotation)>,
    ) -> Self {
        let mut dossiers = Self {
            persona_list: List::default(),
            clues_panel: Paragraph::default(),
            note_input: Self::empty_note_input(theme),
            personas,
            clues,
            annotations: annotations.into_iter().collect(),
            filter: GroupFilter::All,
            note_mode: false,
            theme,
        };
        dossiers.rebuild();
        dossiers
    }

    fn empty_note_input(theme: Theme) -> Input {
        Input::default()
            .title("Note for the selected persona", tui_layout::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .input_type(InputType::Text)
    }

    fn visible(&self) -> Vec<&Persona> {
        self.personas
            .iter()
            .filter(|persona| self.filter.matches(persona))
            .collect()
    }

    fn rebuild(&mut self) {
        let clue_lines = if self.clues.is_empty() {
            vec![TextSpan::from("No clues assigned to you yet")]
        } else {
            self.clues
                .iter()
                .map(|clue| TextSpan::from(format!("* {clue}")))
                .collect()
        };

        self.clues_panel = Paragraph::default()
            .title("Your clues", tuirealm::props::Alignment::Left)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .text(&clue_lines);

        let rows = {
            let visible = self.visible();
            if visible.is_empty() {
                vec![vec![TextSpan::from("No personas in this group")]]
            } else {
                visible
                    .iter()
                    .map(|persona| {
                        let annotation = self.annotations.get(&persona.username);
                        let struck = annotation.is_some_and(|a| a.struck);
                        let highlighted = annotation.is_some_and(|a| a.highlighted);
                        let has_note = annotation.and_then(|a| a.note.as_ref()).is_some();

                        let name_color = if struck {
                            Color::DarkGray
                        } else if highlighted {
                            Color::Yellow
                        } else {
                            Color::Reset
                        };

                        let mark = if struck { "x " } else { "  " };
                        let note_mark = if has_note { " [note]" } else { "" };

                        vec![
                            TextSpan::from(mark).fg(Color::DarkGray),
                            TextSpan::from(persona.username.as_str()).fg(name_color),
                            TextSpan::from(format!(" ({})", persona.group))
                                .fg(accent_color(self.theme)),
                            TextSpan::from(format!(" {}{note_mark}", persona.description)),
                        ]
                    })
                    .collect()
            }
        };

        self.persona_list = List::default()
            .title(
                format!("Character dossiers [{}]", self.filter.label()),
                tuirealm::props::Alignment::Left,
            )
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

    fn selected_username(&self) -> Option<String> {
        let visible = self.visible();
        visible
            .get(self.persona_list.states.list_index)
            .map(|persona| persona.username.clone())
    }

    fn toggle(&mut self, persona: String, apply: impl FnOnce(&mut PersonaAnnotation)) -> Msg {
        let mut annotation = self.annotations.get(&persona).cloned().unwrap_or_default();
        apply(&mut annotation);

        if annotation.is_empty() {
            self.annotations.remove(&persona);
        } else {
            self.annotations.insert(persona.clone(), annotation.clone());
        }
        self.rebuild();

        Msg::Annotate {
            persona,
            annotation,
        }
    }

    fn note_value(&self) -> String {
        match self.note_input.state() {
            State::One(StateValue::String(value)) => value,
            _ => String::new(),
        }
    }
}

impl Component<Msg, UserEvent> for Dossiers {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if matches!(event, Event::User(_)) {
            return None;
        }

        if self.note_mode {
            let cmd = match event {
                Event::Keyboard(KeyEvent {
                    code: Key::Enter,
                    modifiers: KeyModifiers::NONE,
                }) => {
                    let persona = self.selected_username()?;
                    let note = self.note_value();
                    let note = note.trim();
                    let note = (!note.is_empty()).then(|| note.to_string());

                    self.note_mode = false;
                    self.note_input = Self::empty_note_input(self.theme);
                    return Some(self.toggle(persona, |annotation| annotation.note = note));
                }

                Event::Keyboard(KeyEvent {
                    code: Key::Esc,
                    modifiers: KeyModifiers::NONE,
                }) => {
                    self.note_mode = false;
                    self.note_input = Self::empty_note_input(self.theme);
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

            return match self.note_input.perform(cmd) {
                CmdResult::Changed(_) => Some(Msg::ReDraw),
                _ => None,
            };
        }

        match event {
            Event::Keyboard(KeyEvent {
                code: Key::Left,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.filter = self.filter.previous();
                self.rebuild();
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Right,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.filter = self.filter.next();
                self.rebuild();
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Up,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.persona_list.perform(Cmd::Move(Direction::Up));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Down,
                modifiers: KeyModifiers::NONE,
            }) => {
                self.persona_list.perform(Cmd::Move(Direction::Down));
                Some(Msg::ReDraw)
            }

            Event::Keyboard(KeyEvent {
                code: Key::Char('s'),
                modifiers: KeyModifiers::NONE,
            }) => {
                let persona = self.selected_username()?;
                Some(self.toggle(persona, |annotation| annotation.struck = !annotation.struck))
            }

            Event::Keyboard(KeyEvent {
                code: Key::Char('h'),
                modifiers: KeyModifiers::NONE,
            }) => {
                let persona = self.selected_username()?;
                Some(self.toggle(persona, |annotation| {
                    annotation.highlighted = !annotation.highlighted
                }))
            }

            Event::Keyboard(KeyEvent {
                code: Key::Char('n'),
                modifiers: KeyModifiers::NONE,
            }) => {
                if self.selected_username().is_some() {
                    self.note_mode = true;
                    return Some(Msg::ReDraw);
                }
                None
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
