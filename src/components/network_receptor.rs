use tui_realm_stdlib::Phantom;
use tuirealm::{Component, Event, MockComponent};

use super::{Msg, UserEvent};

/// Invisible component that hands every network event to the model, which
/// owns screen transitions.
#[derive(MockComponent, Default)]
pub struct NetworkReceptor {
    component: Phantom,
}

impl Component<Msg, UserEvent> for NetworkReceptor {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        match event {
            Event::User(user_event) => Some(Msg::Network(user_event)),
            _ => None,
        }
    }
}
