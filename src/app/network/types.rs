use crate::app::types::{
    Message, MurderClues, Persona, PersonaAnnotation, ReceivedDirectMessage, Room, SavedRoomEntry,
    SentDirectMessage, Theme, User,
};

/// Everything the network thread can report back to the interface.
#[derive(Debug, PartialEq, Eq, PartialOrd, Clone)]
pub enum UserEvent {
    /// Bootstrap finished; `user` is `None` when no valid session exists.
    SessionReady {
        user: Option<User>,
    },
    LoggedIn {
        user: User,
    },
    LoginFailed {
        reason: String,
    },
    LoggedOut,
    RoomOpened {
        room: Room,
        messages: Vec<Message>,
    },
    RoomOpenFailed {
        code4: String,
        reason: String,
    },
    /// Messages accepted by the merge since the last report, in order.
    NewMessages {
        code4: String,
        messages: Vec<Message>,
    },
    /// The user's own send was accepted. `appended` is false when a poll
    /// delivered the same message first.
    MessageSent {
        code4: String,
        message: Message,
        appended: bool,
    },
    /// The send failed; `content` is handed back for resubmission.
    SendRejected {
        code4: String,
        content: String,
        reason: String,
        retryable: bool,
    },
    SavedRooms {
        saved: Vec<SavedRoomEntry>,
        recent: Vec<SavedRoomEntry>,
    },
    Dossier {
        personas: Vec<Persona>,
        clues: Vec<String>,
        annotations: Vec<(String, PersonaAnnotation)>,
    },
    AdminData {
        personas: Vec<Persona>,
        murder_clues: MurderClues,
        rooms: Vec<Room>,
    },
    RoomCreated {
        room: Room,
    },
    ReceivedDirectMessages {
        messages: Vec<ReceivedDirectMessage>,
    },
    SentDirectMessages {
        messages: Vec<SentDirectMessage>,
    },
    DirectMessageSent {
        to: String,
    },
    UnreadDirectMessages {
        count: u64,
    },
    InfoMessage(String),
    NetworkError(String),
}

/// Requests the interface can hand to the network thread.
#[derive(Debug)]
pub enum Request {
    Bootstrap,
    Login { username: String, password: String },
    Logout,
    OpenRoom { code4: String },
    LeaveRoom,
    SendMessage { code4: String, content: String },
    FetchSavedRooms,
    RemoveSavedRoom { code4: String },
    FetchDossier,
    SetAnnotation { persona: String, annotation: PersonaAnnotation },
    FetchAdmin,
    CreateRoom { player_a: String, player_b: String },
    FetchReceivedDirectMessages,
    FetchSentDirectMessages,
    SendDirectMessage { user_username: String, content: String },
    SetTheme { theme: Theme },
    Quit,
}
