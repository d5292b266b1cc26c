use tuirealm::props::{Attribute, AttrValue, Color};
use tuirealm::MockComponent;

use crate::app::types::{PersonaAnnotation, Theme};

pub mod admin;
pub mod bottom_bar;
pub mod conversation;
pub mod dossier;
pub mod help;
pub mod home;
pub mod inbox;
pub mod login;
pub mod menu;
pub mod network_receptor;
pub mod rooms;

/// All the components must implement methods on these two types, so re export them
pub use crate::app::network::types::UserEvent;

// Let's define the messages handled by our app. NOTE: it must derive `PartialEq`
#[derive(Debug, PartialEq)]
pub enum Msg {
    AppClose,
    /// A network event forwarded to the model for screen transitions.
    Network(UserEvent),
    Menu(MenuSelection),
    FocusNext,
    SubmitLogin {
        username: String,
        password: String,
    },
    OpenRoom(String),
    RemoveSavedRoom(String),
    LeaveRoom,
    SendChatMessage {
        code4: String,
        content: String,
    },
    Annotate {
        persona: String,
        annotation: PersonaAnnotation,
    },
    CreateRoom {
        player_a: String,
        player_b: String,
    },
    SendDirectMessage {
        user_username: String,
        content: String,
    },
    ReDraw,
}

// Let's define the component ids for our application
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub enum Id {
    Menu,
    BottomBar,
    RoomsPane,
    Help,
    NetworkReceptor,
    Login,
    Home,
    Conversation,
    Dossiers,
    Admin,
    Inbox,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MenuSelection {
    Home,
    Dossiers,
    Messages,
    Admin,
    ToggleTheme,
    Logout,
    Quit,
}

pub fn accent_color(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Green,
        Theme::Light => Color::Blue,
    }
}

/// Whether the wrapped widget currently holds focus. Components with Any
/// subscriptions use this to ignore keyboard traffic meant for the active
/// component.
pub fn has_focus<C: MockComponent>(component: &C) -> bool {
    component.query(Attribute::Focus) == Some(AttrValue::Flag(true))
}
