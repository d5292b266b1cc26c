use tui_realm_stdlib::Paragraph;
use tuirealm::props::{BorderType, Borders, Color, TextSpan};
use tuirealm::{Component, Event, MockComponent};

use crate::app::types::Theme;

use super::{accent_color, Msg, UserEvent};

/// Status line at the bottom of the screen. Shows the most recent
/// transient outcome: errors, rate-limit warnings, confirmations.
#[derive(MockComponent)]
pub struct BottomBar {
    component: Paragraph,
    theme: Theme,
}

impl BottomBar {
    pub fn new(theme: Theme) -> Self {
        Self {
            component: Self::status(theme, Color::Reset, "Ready"),
            theme,
        }
    }

    fn status(theme: Theme, color: Color, text: &str) -> Paragraph {
        Paragraph::default()
            .text(&[TextSpan::from(text).fg(color)])
            .borders(
                Borders::default()
                    .modifiers(BorderType::Rounded)
                    .color(accent_color(theme)),
            )
    }

    fn set(&mut self, color: Color, text: &str) {
        self.component = Self::status(self.theme, color, text);
    }
}

impl Component<Msg, UserEvent> for BottomBar {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        let Event::User(user_event) = event else {
            return None;
        };

        match user_event {
            UserEvent::NetworkError(reason) => self.set(Color::Red, &reason),
            UserEvent::InfoMessage(info) => self.set(Color::Reset, &info),
            UserEvent::LoggedIn { user } => {
                self.set(Color::Reset, &format!("Logged in as {}", user.username))
            }
            UserEvent::LoggedOut => self.set(Color::Reset, "Logged out"),
            UserEvent::RoomOpenFailed { code4, reason } => {
                self.set(Color::Red, &format!("{reason} ({code4})"))
            }
            UserEvent::SendRejected {
                reason, retryable, ..
            } => {
                let color = if retryable { Color::Yellow } else { Color::Red };
                self.set(color, &reason);
            }
            UserEvent::DirectMessageSent { to } => {
                self.set(Color::Reset, &format!("Message sent to {to}"))
            }
            _ => return None,
        }

        Some(Msg::ReDraw)
    }
}
