//! The conversation store — one bounded history per conversation id.
//!
//! Every history sits behind its own async mutex. Handlers take the
//! per-conversation guard for the whole user → reply exchange, so two
//! requests for the same chat are serialized while different chats only
//! share the brief map lookup.

use crate::history::ConversationHistory;
use relaybot_core::error::MemoryError;
use relaybot_core::message::{ConversationId, Turn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

type Slot = Arc<Mutex<ConversationHistory>>;

/// Process-lifetime store of conversation histories.
pub struct ConversationStore {
    max_turns: usize,
    conversations: RwLock<HashMap<ConversationId, Slot>>,
}

impl ConversationStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
            conversations: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    async fn existing(&self, id: &ConversationId) -> Option<Slot> {
        self.conversations.read().await.get(id).cloned()
    }

    async fn slot(&self, id: &ConversationId) -> Slot {
        if let Some(slot) = self.existing(id).await {
            return slot;
        }
        let mut conversations = self.conversations.write().await;
        conversations
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(conversation = %id, "Creating conversation history");
                Arc::new(Mutex::new(ConversationHistory::new(self.max_turns)))
            })
            .clone()
    }

    /// Take exclusive hold of one conversation, creating it if absent.
    ///
    /// Other requests for the same id wait until the guard is dropped.
    pub async fn lock(&self, id: &ConversationId) -> ConversationGuard {
        let slot = self.slot(id).await;
        ConversationGuard {
            history: slot.lock_owned().await,
        }
    }

    /// Append a user turn and return the history after truncation.
    pub async fn append_user_turn(&self, id: &ConversationId, text: impl Into<String>) -> Vec<Turn> {
        let mut guard = self.lock(id).await;
        guard.push_user(text);
        guard.turns()
    }

    /// Append an assistant turn to an existing conversation.
    pub async fn append_assistant_turn(
        &self,
        id: &ConversationId,
        text: impl Into<String>,
    ) -> Result<(), MemoryError> {
        let slot = self
            .existing(id)
            .await
            .ok_or_else(|| MemoryError::UnknownConversation(id.to_string()))?;
        slot.lock().await.push(Turn::assistant(text));
        Ok(())
    }

    /// Current turns for `id`, oldest first; empty when the id is unknown.
    pub async fn get_history(&self, id: &ConversationId) -> Vec<Turn> {
        match self.existing(id).await {
            Some(slot) => slot.lock().await.to_vec(),
            None => Vec::new(),
        }
    }

    pub async fn contains(&self, id: &ConversationId) -> bool {
        self.conversations.read().await.contains_key(id)
    }

    /// Number of conversations seen since startup.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(crate::DEFAULT_MAX_TURNS)
    }
}

/// Exclusive access to one conversation's history.
pub struct ConversationGuard {
    history: OwnedMutexGuard<ConversationHistory>,
}

impl ConversationGuard {
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Turn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.history.push(Turn::assistant(text));
    }

    /// Snapshot of the turns, oldest first.
    pub fn turns(&self) -> Vec<Turn> {
        self.history.to_vec()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaybot_core::message::Role;
    use std::time::Duration;

    fn id(s: &str) -> ConversationId {
        ConversationId::from(s)
    }

    #[tokio::test]
    async fn first_user_turn_creates_history() {
        let store = ConversationStore::default();
        assert!(!store.contains(&id("123")).await);

        let turns = store.append_user_turn(&id("123"), "Hola").await;
        assert_eq!(turns, vec![Turn::user("Hola")]);
        assert!(store.contains(&id("123")).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn assistant_turn_follows_user_turn() {
        let store = ConversationStore::default();
        store.append_user_turn(&id("123"), "Hola").await;
        store
            .append_assistant_turn(&id("123"), "Hola! ¿En qué te ayudo?")
            .await
            .unwrap();

        let history = store.get_history(&id("123")).await;
        let roles: Vec<Role> = history.iter().map(|t| t.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn assistant_turn_for_unknown_conversation_fails() {
        let store = ConversationStore::default();
        let err = store.append_assistant_turn(&id("ghost"), "hi").await.unwrap_err();
        assert!(matches!(err, MemoryError::UnknownConversation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_history_is_empty() {
        let store = ConversationStore::default();
        assert!(store.get_history(&id("nobody")).await.is_empty());
        assert!(!store.contains(&id("nobody")).await);
    }

    #[tokio::test]
    async fn truncates_to_most_recent_turns() {
        let store = ConversationStore::new(10);
        for i in 1..=11 {
            store.append_user_turn(&id("c"), format!("m{i}")).await;
        }
        let history = store.get_history(&id("c")).await;
        assert_eq!(history.len(), 10);
        assert_eq!(history.first().unwrap().content, "m2");
        assert_eq!(history.last().unwrap().content, "m11");
    }

    #[tokio::test]
    async fn conversations_are_independent() {
        let store = ConversationStore::default();
        store.append_user_turn(&id("a"), "uno").await;
        store.append_user_turn(&id("b"), "dos").await;
        store.append_user_turn(&id("a"), "tres").await;

        assert_eq!(store.get_history(&id("a")).await.len(), 2);
        assert_eq!(store.get_history(&id("b")).await, vec![Turn::user("dos")]);
    }

    #[tokio::test]
    async fn guard_blocks_same_id_only() {
        let store = Arc::new(ConversationStore::default());
        let mut guard = store.lock(&id("a")).await;
        guard.push_user("held");

        // A different conversation proceeds while "a" is held.
        tokio::time::timeout(
            Duration::from_secs(1),
            store.append_user_turn(&id("b"), "free"),
        )
        .await
        .expect("other conversation must not wait");

        let blocked = {
            let store = store.clone();
            tokio::spawn(async move { store.append_user_turn(&id("a"), "later").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished());

        guard.push_assistant("reply");
        drop(guard);

        let turns = blocked.await.unwrap();
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["held", "reply", "later"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_never_exceed_cap() {
        let store = Arc::new(ConversationStore::new(10));
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut guard = store.lock(&id("shared")).await;
                guard.push_user(format!("u{i}"));
                tokio::task::yield_now().await;
                guard.push_assistant(format!("a{i}"));
                assert!(guard.len() <= 10);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let history = store.get_history(&id("shared")).await;
        assert_eq!(history.len(), 10);
        // Each exchange stayed contiguous: user turn immediately followed by its reply.
        for pair in history.chunks(2) {
            let user = pair[0].content.trim_start_matches('u');
            let assistant = pair[1].content.trim_start_matches('a');
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(user, assistant);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_new_ids_are_all_created() {
        let store = Arc::new(ConversationStore::default());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append_user_turn(&id(&format!("chat-{i}")), "hola").await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().len(), 1);
        }
        assert_eq!(store.len().await, 32);
    }
}
