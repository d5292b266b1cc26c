use tui_realm_stdlib::Table;
use tuirealm::props::{BorderType, Borders, TextSpan};
use tuirealm::{Component, Event, MockComponent};

use crate::app::types::Theme;

use super::{accent_color, Msg, UserEvent};

#[derive(MockComponent)]
pub struct Help {
    component: Table,
}

impl Help {
    pub fn new(theme: Theme) -> Self {
        let component = Table::default()
            .title("Navigation", tuirealm::props::Alignment::Center)
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
            .table(vec![
                vec![TextSpan::from("Tab"), TextSpan::from("Switch focus")],
                vec![TextSpan::from("Arrow keys"), TextSpan::from("Navigate")],
                vec![TextSpan::from("Return / Enter"), TextSpan::from("Select / Send")],
                vec![TextSpan::from("Esc"), TextSpan::from("Back / Quit")],
                vec![TextSpan::from("PgUp / PgDn"), TextSpan::from("Scroll messages")],
                vec![TextSpan::from("s / h / n"), TextSpan::from("Mark dossier")],
            ]);

        Self { component }
    }
}

impl Component<Msg, UserEvent> for Help {
    fn on(&mut self, _: Event<UserEvent>) -> Option<Msg> {
        None
    }
}
