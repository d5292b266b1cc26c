use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::types::{PersonaAnnotation, Room, SavedRoomEntry, Theme};
use super::utils;

/// The recent-rooms list keeps only the most recently visited entries.
pub const ROOM_HISTORY_CAPACITY: usize = 5;

const RECORD_VERSION: u32 = 1;

const SESSION_FILE: &str = "session.toml";
const SAVED_ROOMS_FILE: &str = "saved_rooms.toml";
const ROOM_HISTORY_FILE: &str = "room_history.toml";
const PREFS_FILE: &str = "prefs.toml";
const DOSSIER_NOTES_FILE: &str = "dossier_notes.toml";

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    version: u32,
    token: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct RoomListRecord {
    version: u32,
    #[serde(default)]
    users: HashMap<String, Vec<SavedRoomEntry>>,
}

impl Default for RoomListRecord {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            users: HashMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PrefsRecord {
    version: u32,
    #[serde(default)]
    theme: Theme,
}

#[derive(Serialize, Deserialize)]
struct DossierNotesRecord {
    version: u32,
    #[serde(default)]
    users: HashMap<String, BTreeMap<String, PersonaAnnotation>>,
}

impl Default for DossierNotesRecord {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            users: HashMap::new(),
        }
    }
}

/// Durable client-side state under the configured state directory.
///
/// Every record is a single versioned toml file namespaced per user
/// inside. Reads of absent or malformed files yield the empty value and
/// writes are best-effort; the server stays the source of truth for
/// everything that matters. Concurrent processes are last-writer-wins on
/// a whole record.
#[derive(Clone)]
pub struct Storage {
    dir: String,
}

impl Storage {
    pub fn new(state_dir: &str) -> Self {
        Self {
            dir: state_dir.to_string(),
        }
    }

    fn file(&self, name: &str) -> String {
        format!("{}/{name}", self.dir)
    }

    pub async fn stored_token(&self) -> Option<String> {
        utils::read_local_storage::<SessionRecord>(&self.file(SESSION_FILE))
            .await
            .and_then(|record| record.token)
    }

    pub async fn store_token(&self, token: &str) {
        let record = SessionRecord {
            version: RECORD_VERSION,
            token: Some(token.to_string()),
        };
        utils::write_local_storage(&self.file(SESSION_FILE), record).await;
    }

    pub async fn clear_token(&self) {
        let record = SessionRecord {
            version: RECORD_VERSION,
            token: None,
        };
        utils::write_local_storage(&self.file(SESSION_FILE), record).await;
    }

    /// Saved rooms for the user, in the order they were first saved.
    pub async fn saved_rooms(&self, username: &str) -> Vec<SavedRoomEntry> {
        self.user_rooms(SAVED_ROOMS_FILE, username).await
    }

    /// Recently visited rooms for the user, most recent first, at most
    /// [`ROOM_HISTORY_CAPACITY`] entries.
    pub async fn room_history(&self, username: &str) -> Vec<SavedRoomEntry> {
        self.user_rooms(ROOM_HISTORY_FILE, username).await
    }

    async fn user_rooms(&self, file: &str, username: &str) -> Vec<SavedRoomEntry> {
        utils::read_local_storage::<RoomListRecord>(&self.file(file))
            .await
            .unwrap_or_default()
            .users
            .remove(username)
            .unwrap_or_default()
    }

    /// Record a successful room visit in both the saved-rooms list and
    /// the bounded recent-rooms history.
    pub async fn record_visit(&self, username: &str, room: &Room) {
        self.record_visit_at(username, room, OffsetDateTime::now_utc())
            .await;
    }

    pub(crate) async fn record_visit_at(
        &self,
        username: &str,
        room: &Room,
        visited: OffsetDateTime,
    ) {
        let path = self.file(SAVED_ROOMS_FILE);
        let mut record = utils::read_local_storage::<RoomListRecord>(&path)
            .await
            .unwrap_or_default();

        let rooms = record.users.entry(username.to_string()).or_default();
        match rooms.iter_mut().find(|entry| entry.code4 == room.code4) {
            Some(entry) => entry.last_visited = visited,
            None => rooms.push(SavedRoomEntry::from_room(room, visited)),
        }
        utils::write_local_storage(&path, record).await;

        let path = self.file(ROOM_HISTORY_FILE);
        let mut record = utils::read_local_storage::<RoomListRecord>(&path)
            .await
            .unwrap_or_default();

        let rooms = record.users.entry(username.to_string()).or_default();
        match rooms.iter_mut().find(|entry| entry.code4 == room.code4) {
            Some(entry) => entry.last_visited = visited,
            None => rooms.push(SavedRoomEntry::from_room(room, visited)),
        }
        rooms.sort_by(|a, b| b.last_visited.cmp(&a.last_visited));
        rooms.truncate(ROOM_HISTORY_CAPACITY);
        utils::write_local_storage(&path, record).await;
    }

    /// Drop a saved room. Removing a code that is not saved is a no-op.
    pub async fn remove_saved_room(&self, username: &str, code4: &str) {
        let path = self.file(SAVED_ROOMS_FILE);
        let mut record = utils::read_local_storage::<RoomListRecord>(&path)
            .await
            .unwrap_or_default();

        if let Some(rooms) = record.users.get_mut(username) {
            rooms.retain(|entry| entry.code4 != code4);
        }

        utils::write_local_storage(&path, record).await;
    }

    /// Synchronous theme read for startup, before any runtime exists.
    pub fn theme_blocking(&self) -> Theme {
        let path = utils::replace_home_dir(&self.file(PREFS_FILE));
        std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| toml::from_str::<PrefsRecord>(&contents).ok())
            .map(|record| record.theme)
            .unwrap_or_default()
    }

    pub async fn theme(&self) -> Theme {
        utils::read_local_storage::<PrefsRecord>(&self.file(PREFS_FILE))
            .await
            .map(|record| record.theme)
            .unwrap_or_default()
    }

    pub async fn store_theme(&self, theme: Theme) {
        let record = PrefsRecord {
            version: RECORD_VERSION,
            theme,
        };
        utils::write_local_storage(&self.file(PREFS_FILE), record).await;
    }

    /// Dossier annotations for the user, keyed by persona username.
    pub async fn annotations(&self, username: &str) -> BTreeMap<String, PersonaAnnotation> {
        utils::read_local_storage::<DossierNotesRecord>(&self.file(DOSSIER_NOTES_FILE))
            .await
            .unwrap_or_default()
            .users
            .remove(username)
            .unwrap_or_default()
    }

    /// Upsert one persona's annotation; an empty annotation deletes the
    /// entry so the record does not accumulate blanks.
    pub async fn set_annotation(
        &self,
        username: &str,
        persona: &str,
        annotation: PersonaAnnotation,
    ) {
        let path = self.file(DOSSIER_NOTES_FILE);
        let mut record = utils::read_local_storage::<DossierNotesRecord>(&path)
            .await
            .unwrap_or_default();

        let notes = record.users.entry(username.to_string()).or_default();
        if annotation.is_empty() {
            notes.remove(persona);
        } else {
            notes.insert(persona.to_string(), annotation);
        }

        utils::write_local_storage(&path, record).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(code4: &str) -> Room {
        Room {
            code4: code4.to_string(),
            player_a: "mark".to_string(),
            player_b: "helly".to_string(),
            created_at: None,
        }
    }

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(seconds).unwrap()
    }

    fn test_storage(name: &str) -> Storage {
        let dir = std::env::temp_dir().join(format!("lumon-storage-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Storage::new(dir.to_str().unwrap())
    }

    #[tokio::test]
    async fn history_evicts_least_recently_visited() {
        let storage = test_storage("eviction");

        for (index, code) in ["AAAA", "BBBB", "CCCC", "DDDD", "EEEE", "FFFF"]
            .iter()
            .enumerate()
        {
            storage
                .record_visit_at("mark", &room(code), at(index as i64))
                .await;
        }

        let history = storage.room_history("mark").await;
        assert_eq!(history.len(), ROOM_HISTORY_CAPACITY);
        assert_eq!(history[0].code4, "FFFF");
        assert!(history.iter().all(|entry| entry.code4 != "AAAA"));
    }

    #[tokio::test]
    async fn revisit_refreshes_instead_of_duplicating() {
        let storage = test_storage("revisit");

        storage.record_visit_at("mark", &room("AAAA"), at(0)).await;
        storage.record_visit_at("mark", &room("BBBB"), at(1)).await;
        storage.record_visit_at("mark", &room("AAAA"), at(2)).await;

        let saved = storage.saved_rooms("mark").await;
        assert_eq!(saved.len(), 2);
        // Saved rooms keep insertion order even when revisited.
        assert_eq!(saved[0].code4, "AAAA");
        assert_eq!(saved[0].last_visited, at(2));

        let history = storage.room_history("mark").await;
        assert_eq!(history.len(), 2);
        // History resorts by recency.
        assert_eq!(history[0].code4, "AAAA");
    }

    #[tokio::test]
    async fn remove_missing_room_is_a_no_op() {
        let storage = test_storage("remove");

        storage.record_visit_at("mark", &room("AAAA"), at(0)).await;
        storage.remove_saved_room("mark", "WXYZ").await;

        let saved = storage.saved_rooms("mark").await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].code4, "AAAA");

        storage.remove_saved_room("mark", "AAAA").await;
        assert!(storage.saved_rooms("mark").await.is_empty());
    }

    #[tokio::test]
    async fn lists_are_namespaced_per_user() {
        let storage = test_storage("namespacing");

        storage.record_visit_at("mark", &room("AAAA"), at(0)).await;
        storage.record_visit_at("helly", &room("BBBB"), at(0)).await;

        let mark = storage.saved_rooms("mark").await;
        assert_eq!(mark.len(), 1);
        assert_eq!(mark[0].code4, "AAAA");

        let helly = storage.saved_rooms("helly").await;
        assert_eq!(helly.len(), 1);
        assert_eq!(helly[0].code4, "BBBB");
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_empty() {
        let storage = test_storage("corruption");

        std::fs::create_dir_all(storage.dir.clone()).unwrap();
        std::fs::write(storage.file(SAVED_ROOMS_FILE), "][ not toml ][").unwrap();

        assert!(storage.saved_rooms("mark").await.is_empty());

        // A visit recovers the record from scratch.
        storage.record_visit_at("mark", &room("AAAA"), at(0)).await;
        assert_eq!(storage.saved_rooms("mark").await.len(), 1);
    }

    #[tokio::test]
    async fn token_roundtrip_and_clear() {
        let storage = test_storage("token");

        assert_eq!(storage.stored_token().await, None);
        storage.store_token("secret").await;
        assert_eq!(storage.stored_token().await.as_deref(), Some("secret"));
        storage.clear_token().await;
        assert_eq!(storage.stored_token().await, None);
    }

    #[tokio::test]
    async fn empty_annotation_deletes_the_entry() {
        let storage = test_storage("annotations");

        storage
            .set_annotation(
                "mark",
                "helly",
                PersonaAnnotation {
                    struck: true,
                    ..Default::default()
                },
            )
            .await;
        assert!(storage.annotations("mark").await.contains_key("helly"));

        storage
            .set_annotation("mark", "helly", PersonaAnnotation::default())
            .await;
        assert!(storage.annotations("mark").await.is_empty());
    }
}
