use super::api::ApiClient;
use super::errors::ApiError;
use super::storage::Storage;
use super::types::User;

/// In-memory source of truth for "who is logged in", backed by the
/// durable token record. The token itself lives on the [`ApiClient`] so
/// every request carries it; this type decides when it is set, persisted
/// and purged.
#[derive(Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }

    /// UI convenience only; the server enforces authorization on every
    /// call regardless.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Restore the session from the stored token, if any.
    ///
    /// A definitive rejection of the token clears it durably; this is the
    /// only place a stale token is detected and purged. A transport
    /// failure leaves the stored token alone so the next start can try
    /// again, but still comes up logged out.
    pub async fn bootstrap(
        &mut self,
        api: &mut ApiClient,
        storage: &Storage,
    ) -> Result<Option<User>, ApiError> {
        let Some(token) = storage.stored_token().await else {
            return Ok(None);
        };

        api.set_token(token);
        match api.me().await {
            Ok(user) => {
                self.user = Some(user.clone());
                Ok(Some(user))
            }
            Err(error) if error.is_unauthenticated() => {
                tracing::info!("stored token rejected, clearing it");
                api.clear_token();
                storage.clear_token().await;
                Ok(None)
            }
            Err(error) => {
                api.clear_token();
                Err(error)
            }
        }
    }

    /// Exchange credentials for a token, persist it, then resolve the
    /// current user. Nothing is persisted when the credentials are bad.
    pub async fn login(
        &mut self,
        api: &mut ApiClient,
        storage: &Storage,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let token = api.login(username, password).await?;

        api.set_token(token.access_token.clone());
        storage.store_token(&token.access_token).await;

        match api.me().await {
            Ok(user) => {
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(error) => {
                api.clear_token();
                storage.clear_token().await;
                Err(error)
            }
        }
    }

    pub async fn logout(&mut self, api: &mut ApiClient, storage: &Storage) {
        api.clear_token();
        storage.clear_token().await;
        self.user = None;
    }
}
