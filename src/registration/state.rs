//! Per-chat conversation state
//!
//! One [`Conversation`] exists per chat that is mid-registration. Absence
//! of a conversation is a first-class state ("no active conversation"),
//! not a special case: lookups return `Option<Conversation>`.
//!
//! The store is process-local and lost on restart; an in-flight
//! registration is abandoned then. There is no expiry for abandoned
//! conversations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Dialogue stage of an active registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for a contact card (or a yes/no on the extracted phone)
    AwaitingPhoneContact,
    AwaitingName,
    AwaitingNameCorrection,
    AwaitingBirthDate,
    AwaitingBirthDateCorrection,
    AwaitingConfirmation,
}

/// Partially collected registration fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub full_name: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
}

impl Collected {
    /// True when every field required for a commit is present.
    pub fn is_complete(&self) -> bool {
        self.full_name.is_some() && self.birth_date.is_some() && self.phone.is_some()
    }
}

/// Mutable state of one chat's registration dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub stage: Stage,
    pub collected: Collected,
}

impl Conversation {
    /// Fresh conversation at the start of the collect sequence.
    pub fn new() -> Self {
        Self {
            stage: Stage::AwaitingPhoneContact,
            collected: Collected::default(),
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyed in-memory store of active conversations.
#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<Mutex<HashMap<String, Conversation>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, identity: &str) -> Option<Conversation> {
        self.inner.lock().await.get(identity).cloned()
    }

    pub async fn set(&self, identity: &str, conversation: Conversation) {
        self.inner.lock().await.insert(identity.to_string(), conversation);
    }

    pub async fn remove(&self, identity: &str) {
        self.inner.lock().await.remove(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_absence_is_the_initial_state() {
        let store = ConversationStore::new();
        assert_eq!(store.get("1").await, None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = ConversationStore::new();
        let mut convo = Conversation::new();
        convo.collected.phone = Some("+79781234567".to_string());

        store.set("1", convo.clone()).await;
        assert_eq!(store.get("1").await, Some(convo));
        assert_eq!(store.get("2").await, None);

        store.remove("1").await;
        assert_eq!(store.get("1").await, None);
    }

    #[test]
    fn test_is_complete_requires_all_fields() {
        let mut collected = Collected::default();
        assert!(!collected.is_complete());
        collected.full_name = Some("Иванов Иван Иванович".to_string());
        collected.birth_date = Some("13.03.2003".to_string());
        assert!(!collected.is_complete());
        collected.phone = Some("+79781234567".to_string());
        assert!(collected.is_complete());
    }
}
