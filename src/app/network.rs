use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

pub mod types;

use tokio::sync::mpsc;
use tuirealm::listener::Poll;

use self::types::{Request, UserEvent};
use super::api::ApiClient;
use super::errors::ApiError;
use super::session::Session;
use super::storage::Storage;
use super::sync::Conversation;
use super::types::{ClientConfig, User};

const NETWORK_MESSAGE_QUEUE_CAPACITY: usize = 16;

/// Runs on its own thread with a current-thread runtime, serving requests
/// from the interface and driving the message poll for the open room.
/// Results are queued as [`UserEvent`]s and drained through the tuirealm
/// listener port.
#[derive(Clone)]
pub struct NetworkClient {
    events: Arc<Mutex<VecDeque<UserEvent>>>,
}

pub trait DisplayNetworkError {
    type Item;
    fn error_handler(self, network_client: &NetworkClient) -> Option<Self::Item>;
}

impl<U> DisplayNetworkError for Result<U, ApiError> {
    type Item = U;
    fn error_handler(self, network_client: &NetworkClient) -> Option<Self::Item> {
        match self {
            Ok(value) => Some(value),
            Err(api_error) => {
                network_client.push_user_event(UserEvent::NetworkError(api_error.to_string()));
                None
            }
        }
    }
}

impl Default for NetworkClient {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(
                NETWORK_MESSAGE_QUEUE_CAPACITY,
            ))),
        }
    }
}

impl NetworkClient {
    #[tokio::main(flavor = "current_thread")]
    pub async fn start_network_client(
        &mut self,
        mut request_receiver: mpsc::UnboundedReceiver<Request>,
        config: ClientConfig,
    ) {
        let mut api = ApiClient::new(&config);
        let storage = Storage::new(&config.state_dir);
        let mut session = Session::default();

        // At most one conversation is ever being synchronized; leaving the
        // room view drops it, which also disarms the poll tick below.
        let mut active_room: Option<Conversation> = None;

        let mut poll_ticker =
            tokio::time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));
        poll_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                request = request_receiver.recv() => {
                    let Some(request) = request else { break };

                    match request {
                        Request::Bootstrap => {
                            match session.bootstrap(&mut api, &storage).await {
                                Ok(user) => {
                                    self.push_user_event(UserEvent::SessionReady {
                                        user: user.clone(),
                                    });
                                    if let Some(user) = user {
                                        self.refresh_home(&api, &storage, &user).await;
                                    }
                                }
                                Err(bootstrap_error) => {
                                    self.push_user_event(UserEvent::SessionReady { user: None });
                                    self.push_user_event(UserEvent::NetworkError(
                                        bootstrap_error.to_string(),
                                    ));
                                }
                            }
                        }

                        Request::Login { username, password } => {
                            match session.login(&mut api, &storage, &username, &password).await {
                                Ok(user) => {
                                    self.push_user_event(UserEvent::LoggedIn { user: user.clone() });
                                    self.refresh_home(&api, &storage, &user).await;
                                }
                                Err(login_error) if login_error.is_unauthenticated() => {
                                    self.push_user_event(UserEvent::LoginFailed {
                                        reason: "Incorrect username or password".to_string(),
                                    });
                                }
                                Err(login_error) => {
                                    self.push_user_event(UserEvent::LoginFailed {
                                        reason: login_error.to_string(),
                                    });
                                }
                            }
                        }

                        Request::Logout => {
                            active_room = None;
                            session.logout(&mut api, &storage).await;
                            self.push_user_event(UserEvent::LoggedOut);
                        }

                        Request::OpenRoom { code4 } => {
                            // Opening a room implicitly leaves the previous one.
                            active_room = None;

                            match self.open_room(&api, &code4).await {
                                Ok(conversation) => {
                                    if let Some(user) = session.user().filter(|user| !user.is_admin()) {
                                        storage.record_visit(&user.username, conversation.room()).await;
                                        self.push_saved_rooms(&storage, &user.username).await;
                                    }

                                    self.push_user_event(UserEvent::RoomOpened {
                                        room: conversation.room().clone(),
                                        messages: conversation.messages().to_vec(),
                                    });

                                    active_room = Some(conversation);
                                    // First poll runs a full interval after open.
                                    poll_ticker.reset();
                                }
                                Err(open_error) => {
                                    let reason = match open_error {
                                        ApiError::NotFound => "Room not found".to_string(),
                                        ApiError::Forbidden => {
                                            "You are not authorized to access this room".to_string()
                                        }
                                        other => other.to_string(),
                                    };
                                    self.push_user_event(UserEvent::RoomOpenFailed { code4, reason });
                                }
                            }
                        }

                        Request::LeaveRoom => {
                            active_room = None;
                        }

                        Request::SendMessage { code4, content } => {
                            match api.send_message(&code4, &content).await {
                                Ok(message) => {
                                    let appended = active_room
                                        .as_mut()
                                        .filter(|conversation| conversation.room().code4 == code4)
                                        .map(|conversation| conversation.confirm_sent(message.clone()))
                                        .unwrap_or(false);

                                    self.push_user_event(UserEvent::MessageSent {
                                        code4,
                                        message,
                                        appended,
                                    });
                                }
                                Err(send_error) => {
                                    let retryable = send_error.is_rate_limited();
                                    let reason = if retryable {
                                        send_error.to_string()
                                    } else {
                                        "Failed to send message".to_string()
                                    };
                                    self.push_user_event(UserEvent::SendRejected {
                                        code4,
                                        content,
                                        reason,
                                        retryable,
                                    });
                                }
                            }
                        }

                        Request::FetchSavedRooms => {
                            if let Some(username) = session.username().map(str::to_string) {
                                self.push_saved_rooms(&storage, &username).await;
                            }
                        }

                        Request::RemoveSavedRoom { code4 } => {
                            if let Some(username) = session.username().map(str::to_string) {
                                storage.remove_saved_room(&username, &code4).await;
                                self.push_saved_rooms(&storage, &username).await;
                            }
                        }

                        Request::FetchDossier => {
                            let personas = api.personas().await.error_handler(self);
                            let clues = api.clues().await.error_handler(self);

                            if let (Some(personas), Some(clues)) = (personas, clues) {
                                let annotations = match session.username() {
                                    Some(username) => storage
                                        .annotations(username)
                                        .await
                                        .into_iter()
                                        .collect(),
                                    None => Vec::new(),
                                };

                                self.push_user_event(UserEvent::Dossier {
                                    personas,
                                    clues: clues.clues,
                                    annotations,
                                });
                            }
                        }

                        Request::SetAnnotation { persona, annotation } => {
                            if let Some(username) = session.username().map(str::to_string) {
                                storage.set_annotation(&username, &persona, annotation).await;
                            }
                        }

                        Request::FetchAdmin => {
                            let personas = api.personas().await.error_handler(self);
                            let murder_clues = api.murder_clues().await.error_handler(self);
                            let rooms = api.rooms().await.error_handler(self);

                            if let (Some(personas), Some(murder_clues), Some(rooms)) =
                                (personas, murder_clues, rooms)
                            {
                                self.push_user_event(UserEvent::AdminData {
                                    personas,
                                    murder_clues,
                                    rooms,
                                });
                            }
                        }

                        Request::CreateRoom { player_a, player_b } => {
                            if let Some(room) =
                                api.create_room(&player_a, &player_b).await.error_handler(self)
                            {
                                self.push_user_event(UserEvent::InfoMessage(format!(
                                    "Room {} created for {player_a} and {player_b}",
                                    room.code4
                                )));
                                self.push_user_event(UserEvent::RoomCreated { room });
                            }
                        }

                        Request::FetchReceivedDirectMessages => {
                            if let Some(messages) =
                                api.received_direct_messages().await.error_handler(self)
                            {
                                self.push_user_event(UserEvent::ReceivedDirectMessages { messages });
                                // The fetch marked them read server-side.
                                self.push_user_event(UserEvent::UnreadDirectMessages { count: 0 });
                            }
                        }

                        Request::FetchSentDirectMessages => {
                            if let Some(messages) =
                                api.sent_direct_messages().await.error_handler(self)
                            {
                                self.push_user_event(UserEvent::SentDirectMessages { messages });
                            }
                        }

                        Request::SendDirectMessage { user_username, content } => {
                            if api
                                .send_direct_message(&user_username, &content)
                                .await
                                .error_handler(self)
                                .is_some()
                            {
                                self.push_user_event(UserEvent::DirectMessageSent {
                                    to: user_username,
                                });
                                if let Some(messages) =
                                    api.sent_direct_messages().await.error_handler(self)
                                {
                                    self.push_user_event(UserEvent::SentDirectMessages { messages });
                                }
                            }
                        }

                        Request::SetTheme { theme } => {
                            storage.store_theme(theme).await;
                        }

                        Request::Quit => break,
                    }
                }

                // Armed only while a room is open. Each cycle runs to
                // completion inside this branch, so polls never overlap
                // and the skipped-tick behavior absorbs slow cycles.
                _ = poll_ticker.tick(), if active_room.is_some() => {
                    if let Some(conversation) = active_room.as_mut() {
                        self.poll_room(&api, conversation).await;
                    }
                }
            }
        }
    }

    async fn open_room(&self, api: &ApiClient, code4: &str) -> Result<Conversation, ApiError> {
        let room = api.room(code4).await?;
        let history = api.room_messages(code4).await?;
        Ok(Conversation::new(room, history))
    }

    async fn poll_room(&self, api: &ApiClient, conversation: &mut Conversation) {
        let code4 = conversation.room().code4.clone();

        match api.stream_messages(&code4, conversation.last_seen_id()).await {
            Ok(batch) => {
                let messages = conversation.merge(batch);
                if !messages.is_empty() {
                    self.push_user_event(UserEvent::NewMessages { code4, messages });
                }
            }
            Err(poll_error) => {
                // Swallowed: one failed cycle must not end the loop.
                tracing::warn!(%code4, ?poll_error, "message poll failed, retrying next tick");
            }
        }
    }

    async fn refresh_home(&self, api: &ApiClient, storage: &Storage, user: &User) {
        if user.is_admin() {
            return;
        }

        self.push_saved_rooms(storage, &user.username).await;

        if let Some(unread) = api.unread_direct_messages().await.error_handler(self) {
            self.push_user_event(UserEvent::UnreadDirectMessages {
                count: unread.count,
            });
        }
    }

    async fn push_saved_rooms(&self, storage: &Storage, username: &str) {
        let saved = storage.saved_rooms(username).await;
        let recent = storage.room_history(username).await;
        self.push_user_event(UserEvent::SavedRooms { saved, recent });
    }

    fn push_user_event(&self, event: UserEvent) {
        tracing::debug!(push_user_event = ?event);
        self.events.lock().unwrap().push_back(event)
    }
}

impl Poll<UserEvent> for NetworkClient {
    fn poll(&mut self) -> tuirealm::listener::ListenerResult<Option<tuirealm::Event<UserEvent>>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .pop_front()
            .map(tuirealm::Event::User))
    }
}
