use std::collections::HashSet;

use super::types::{Message, Room};

/// In-memory message sequence for one open room.
///
/// Two producers write into it: the user's own sends (confirmed by the
/// server) and the background poll. Both go through the same id guard, so
/// a message can never appear twice no matter which path delivers it
/// first. The sequence is append-only and ordered by arrival.
pub struct Conversation {
    room: Room,
    messages: Vec<Message>,
    seen: HashSet<i64>,
}

impl Conversation {
    pub fn new(room: Room, history: Vec<Message>) -> Self {
        let mut conversation = Self {
            room,
            messages: Vec::with_capacity(history.len()),
            seen: HashSet::with_capacity(history.len()),
        };
        conversation.merge(history);
        conversation
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Cursor for the next poll: the id of the last appended message.
    pub fn last_seen_id(&self) -> Option<i64> {
        self.messages.last().map(|message| message.id)
    }

    /// Append the messages from `incoming` that are not already present,
    /// preserving both the existing order and the batch's relative order.
    /// Returns the accepted messages; merging the same batch again
    /// returns nothing and changes nothing.
    pub fn merge(&mut self, incoming: Vec<Message>) -> Vec<Message> {
        let mut accepted = Vec::new();

        for message in incoming {
            if self.seen.insert(message.id) {
                self.messages.push(message.clone());
                accepted.push(message);
            }
        }

        accepted
    }

    /// Record the server-confirmed copy of a message this user just sent.
    /// Returns false when a concurrent poll already delivered it.
    pub fn confirm_sent(&mut self, message: Message) -> bool {
        !self.merge(vec![message]).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room {
            code4: "ABCD".to_string(),
            player_a: "mark".to_string(),
            player_b: "helly".to_string(),
            created_at: None,
        }
    }

    fn message(id: i64, sender: &str, content: &str) -> Message {
        Message {
            id,
            sender: sender.to_string(),
            content: content.to_string(),
            ts: None,
        }
    }

    fn ids(conversation: &Conversation) -> Vec<i64> {
        conversation
            .messages()
            .iter()
            .map(|message| message.id)
            .collect()
    }

    #[test]
    fn merge_is_idempotent() {
        let mut conversation = Conversation::new(room(), vec![message(1, "mark", "hi")]);

        let batch = vec![message(2, "helly", "hello"), message(3, "mark", "how")];
        conversation.merge(batch.clone());
        let accepted = conversation.merge(batch);

        assert!(accepted.is_empty());
        assert_eq!(ids(&conversation), vec![1, 2, 3]);
    }

    #[test]
    fn merge_preserves_order_and_drops_duplicates() {
        let mut conversation =
            Conversation::new(room(), vec![message(1, "mark", "a"), message(2, "helly", "b")]);

        let accepted = conversation.merge(vec![
            message(2, "helly", "b"),
            message(4, "helly", "d"),
            message(3, "mark", "c"),
        ]);

        // Existing entries keep their positions; new ones append in the
        // batch's relative order.
        assert_eq!(ids(&conversation), vec![1, 2, 4, 3]);
        assert_eq!(
            accepted.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![4, 3]
        );
    }

    #[test]
    fn identity_is_the_id_not_the_content() {
        let mut conversation = Conversation::new(room(), vec![message(1, "mark", "hi")]);

        // Same content, different id: a distinct message.
        conversation.merge(vec![message(2, "mark", "hi")]);
        assert_eq!(conversation.len(), 2);

        // Same id, different content: a duplicate, dropped.
        conversation.merge(vec![message(1, "mark", "edited")]);
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0].content, "hi");
    }

    #[test]
    fn optimistic_send_then_poll_echo_yields_one_copy() {
        let mut conversation = Conversation::new(room(), Vec::new());
        assert!(conversation.is_empty());

        let sent = message(7, "mark", "hello");
        assert!(conversation.confirm_sent(sent.clone()));

        // The next poll echoes the same message back.
        let accepted = conversation.merge(vec![sent]);
        assert!(accepted.is_empty());
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].sender, "mark");
        assert_eq!(conversation.messages()[0].content, "hello");
    }

    #[test]
    fn poll_echo_then_confirm_yields_one_copy() {
        let mut conversation = Conversation::new(room(), Vec::new());

        let sent = message(7, "mark", "hello");
        conversation.merge(vec![sent.clone()]);

        // The send round-trip resolves after the poll already delivered it.
        assert!(!conversation.confirm_sent(sent));
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn cursor_follows_the_last_appended_message() {
        let mut conversation = Conversation::new(room(), Vec::new());
        assert_eq!(conversation.last_seen_id(), None);

        conversation.merge(vec![message(3, "mark", "a"), message(5, "helly", "b")]);
        assert_eq!(conversation.last_seen_id(), Some(5));
    }

    #[test]
    fn history_with_duplicates_is_deduplicated_on_open() {
        let conversation = Conversation::new(
            room(),
            vec![message(1, "mark", "a"), message(1, "mark", "a"), message(2, "helly", "b")],
        );
        assert_eq!(ids(&conversation), vec![1, 2]);
    }
}
