use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    pub log_file: Option<String>,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_state_dir() -> String {
    "~/.local/state/lumon".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            state_dir: default_state_dir(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct Persona {
    pub username: String,
    pub group: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct Room {
    pub code4: String,
    #[serde(rename = "playerA")]
    pub player_a: String,
    #[serde(rename = "playerB")]
    pub player_b: String,
    /// Rendered as-is; the server's timestamp format is not interpreted.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Room {
    /// The participant the given user is talking to. Admins observe both.
    pub fn other_player(&self, username: &str) -> &str {
        if self.player_a == username {
            &self.player_b
        } else {
            &self.player_a
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct MurderClues {
    pub to_outies: Vec<String>,
    pub to_innies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct SentDirectMessage {
    pub id: i64,
    pub user_username: String,
    pub content: String,
    #[serde(default)]
    pub ts: Option<String>,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct ReceivedDirectMessage {
    pub id: i64,
    pub admin_username: String,
    pub content: String,
    #[serde(default)]
    pub ts: Option<String>,
}

/// One durable shortcut entry for a previously visited room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct SavedRoomEntry {
    pub code4: String,
    pub player_a: String,
    pub player_b: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_visited: OffsetDateTime,
}

impl SavedRoomEntry {
    pub fn from_room(room: &Room, visited: OffsetDateTime) -> Self {
        Self {
            code4: room.code4.clone(),
            player_a: room.player_a.clone(),
            player_b: room.player_b.clone(),
            last_visited: visited,
        }
    }
}

/// Per-persona dossier markup kept on the player's own machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct PersonaAnnotation {
    #[serde(default)]
    pub struck: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl PersonaAnnotation {
    pub fn is_empty(&self) -> bool {
        !self.struck && !self.highlighted && self.note.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}
