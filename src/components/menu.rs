use tui_realm_stdlib::Radio;
use tuirealm::{
    command::{Cmd, CmdResult},
    event::{Key, KeyEvent, KeyModifiers},
    props::{BorderType, Borders},
    Component, Event, MockComponent,
};

use crate::app::types::Theme;

use super::{accent_color, has_focus, MenuSelection, Msg, UserEvent};

/// Top navigation bar. Entries depend on the logged-in user's role; the
/// Messages entry carries the unread-note badge for regular users.
pub struct Menu {
    component: Radio,
    entries: Vec<MenuSelection>,
    username: String,
    unread: u64,
    theme: Theme,
}

impl MockComponent for Menu {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        self.component.view(frame, area)
    }

    fn query(&self, attr: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        self.component.query(attr)
    }

    fn attr(&mut self, attr: tuirealm::Attribute, value: tuirealm::AttrValue) {
        self.component.attr(attr, value)
    }

    fn state(&self) -> tuirealm::State {
        self.component.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.component.perform(cmd)
    }
}

impl Menu {
    pub fn new(theme: Theme, username: &str, is_admin: bool) -> Self {
        let mut entries = vec![
            MenuSelection::Home,
            MenuSelection::Dossiers,
            MenuSelection::Messages,
        ];
        if is_admin {
            entries.push(MenuSelection::Admin);
        }
        entries.extend([
            MenuSelection::ToggleTheme,
            MenuSelection::Logout,
            MenuSelection::Quit,
        ]);

        let mut menu = Self {
            component: Radio::default(),
            entries,
            username: username.to_string(),
            unread: 0,
            theme,
        };
        menu.rebuild();
        menu
    }

    fn label(&self, entry: MenuSelection) -> String {
        match entry {
            MenuSelection::Home => "Home".to_string(),
            MenuSelection::Dossiers => "Dossiers".to_string(),
            MenuSelection::Messages => {
                if self.unread > 0 {
                    format!("Messages ({})", self.unread)
                } else {
                    "Messages".to_string()
                }
            }
            MenuSelection::Admin => "Admin".to_string(),
            MenuSelection::ToggleTheme => "Theme".to_string(),
            MenuSelection::Logout => "Logout".to_string(),
            MenuSelection::Quit => "Quit".to_string(),
        }
    }

    fn rebuild(&mut self) {
        let choices = self
            .entries
            .iter()
            .map(|entry| self.label(*entry))
            .collect::<Vec<_>>();

        self.component = Radio::default()
            .choices(&choices)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(self.theme)),
            )
            .title(
                format!("Severance Mystery [{}]", self.username),
                tuirealm::props::Alignment::Left,
            );
    }
}

impl Component<Msg, UserEvent> for Menu {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        if let Event::User(user_event) = event {
            if let UserEvent::UnreadDirectMessages { count } = user_event {
                if self.unread != count {
                    self.unread = count;
                    self.rebuild();
                    return Some(Msg::ReDraw);
                }
            }
            return None;
        }

        // Keyboard traffic belongs to whichever component holds focus.
        if !has_focus(&self.component) {
            return None;
        }

        let cmd = match event {
            Event::Keyboard(KeyEvent {
                code: Key::Left,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Move(tuirealm::command::Direction::Left),

            Event::Keyboard(KeyEvent {
                code: Key::Right,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Move(tuirealm::command::Direction::Right),

            Event::Keyboard(KeyEvent {
                code: Key::Enter,
                modifiers: KeyModifiers::NONE,
            }) => Cmd::Submit,

            Event::Keyboard(KeyEvent {
                code: Key::Tab,
                modifiers: KeyModifiers::NONE,
            }) => return Some(Msg::FocusNext),

            Event::Keyboard(KeyEvent {
                code: Key::Esc,
                modifiers: KeyModifiers::NONE,
            }) => return Some(Msg::AppClose),

            _ => Cmd::None,
        };

        match self.perform(cmd) {
            CmdResult::Changed(_) => Some(Msg::ReDraw),
            CmdResult::Submit(_) => {
                let choice = self.component.states.choice;
                self.entries.get(choice).copied().map(Msg::Menu)
            }
            _ => None,
        }
    }
}
