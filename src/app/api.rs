use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::errors::ApiError;
use super::types::{
    ClientConfig, Message, MurderClues, Persona, ReceivedDirectMessage, Room, SentDirectMessage,
    User,
};

#[derive(Debug, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CluesResponse {
    pub clues: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}

/// Typed wrapper over the game service's REST interface.
///
/// Holds the bearer token for the current session; every request carries
/// it once it has been set. Status codes are folded into [`ApiError`] so
/// the callers only ever deal with the taxonomy, not raw HTTP.
pub struct ApiClient {
    http: reqwest::Client,
    stream_http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Cannot initialize the http client");

        // The stream request gets a timeout just above the poll interval so
        // a hanging cycle fails before the next one is due.
        let stream_http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_interval_secs + 1))
            .build()
            .expect("Cannot initialize the http client");

        Self {
            http,
            stream_http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|decode_error| ApiError::Decode(decode_error.to_string()))
    }

    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(|transport_error| ApiError::Transport(transport_error.to_string()))?;

        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(|transport_error| ApiError::Transport(transport_error.to_string()))?;

        Self::decode(response).await
    }

    /// Exchange credentials for a bearer token. The token is not stored on
    /// the client; the session store decides whether to persist it.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let response = self
            .http
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|transport_error| ApiError::Transport(transport_error.to_string()))?;

        Self::decode(response).await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/me").await
    }

    pub async fn personas(&self) -> Result<Vec<Persona>, ApiError> {
        self.get("/personas").await
    }

    pub async fn clues(&self) -> Result<CluesResponse, ApiError> {
        self.get("/clues").await
    }

    pub async fn murder_clues(&self) -> Result<MurderClues, ApiError> {
        self.get("/clues/murder").await
    }

    pub async fn rooms(&self) -> Result<Vec<Room>, ApiError> {
        self.get("/rooms").await
    }

    pub async fn create_room(&self, player_a: &str, player_b: &str) -> Result<Room, ApiError> {
        self.post_json(
            "/rooms",
            &serde_json::json!({ "playerA": player_a, "playerB": player_b }),
        )
        .await
    }

    pub async fn room(&self, code4: &str) -> Result<Room, ApiError> {
        self.get(&format!("/rooms/{code4}")).await
    }

    pub async fn room_messages(&self, code4: &str) -> Result<Vec<Message>, ApiError> {
        self.get(&format!("/rooms/{code4}/messages")).await
    }

    pub async fn send_message(&self, code4: &str, content: &str) -> Result<Message, ApiError> {
        self.post_json(
            &format!("/rooms/{code4}/msg"),
            &serde_json::json!({ "content": content }),
        )
        .await
    }

    /// Fetch messages created after `after`. Uses the shorter-fused client
    /// so one hung cycle cannot overlap the next.
    pub async fn stream_messages(
        &self,
        code4: &str,
        after: Option<i64>,
    ) -> Result<Vec<Message>, ApiError> {
        let mut request = self
            .authorize(self.stream_http.get(self.url(&format!("/rooms/{code4}/stream"))));

        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }

        let response = request
            .send()
            .await
            .map_err(|transport_error| ApiError::Transport(transport_error.to_string()))?;

        Self::decode(response).await
    }

    pub async fn send_direct_message(
        &self,
        user_username: &str,
        content: &str,
    ) -> Result<SentDirectMessage, ApiError> {
        self.post_json(
            "/dms",
            &serde_json::json!({ "user_username": user_username, "content": content }),
        )
        .await
    }

    pub async fn sent_direct_messages(&self) -> Result<Vec<SentDirectMessage>, ApiError> {
        self.get("/dms/sent").await
    }

    /// Fetching also marks the notes read on the server side.
    pub async fn received_direct_messages(&self) -> Result<Vec<ReceivedDirectMessage>, ApiError> {
        self.get("/dms/received").await
    }

    pub async fn unread_direct_messages(&self) -> Result<UnreadCount, ApiError> {
        self.get("/dms/unread").await
    }
}
