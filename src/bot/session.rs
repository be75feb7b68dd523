//! Per-chat session store.
//!
//! One mutable record per chat tracks which interactive flow, if any, is
//! waiting for the next inbound event. The store is an explicit component
//! handed to every handler; flows never live in process-wide state. Records
//! are created lazily and expire back to [`Flow::Idle`] after a period of
//! inactivity so an abandoned flow cannot occupy its record forever.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use teloxide::types::ChatId;
use tokio::sync::Mutex;

use crate::bot::quiz::QuizProgress;

/// The interactive flow a chat is currently in. Quiz state lives only inside
/// the `Quiz` variant, so it exists exactly as long as the quiz flow does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Idle,
    Registration,
    AttendEvent,
    UploadGoodDeed,
    Quiz(QuizProgress),
}

#[derive(Debug)]
struct SessionRecord {
    flow: Flow,
    last_activity: Instant,
}

impl SessionRecord {
    fn new() -> Self {
        Self {
            flow: Flow::Idle,
            last_activity: Instant::now(),
        }
    }
}

/// Shared in-memory session table, keyed by chat id.
///
/// Per-chat access is effectively sequential because Telegram delivers one
/// update at a time per chat; the mutex makes cross-chat access safe.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<ChatId, SessionRecord>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the chat's current flow, creating an idle record if the chat
    /// is new. The second value reports whether a previously active flow just
    /// lapsed by exceeding the inactivity TTL; a lapsed flow is reset to
    /// `Idle` so the caller can inform the user instead of silently routing
    /// the event into stale state.
    pub async fn current_flow(&self, chat_id: ChatId) -> (Flow, bool) {
        let mut table = self.inner.lock().await;
        let record = table.entry(chat_id).or_insert_with(SessionRecord::new);

        let lapsed = record.flow != Flow::Idle && record.last_activity.elapsed() > self.ttl;
        if lapsed {
            record.flow = Flow::Idle;
        }
        record.last_activity = Instant::now();
        (record.flow.clone(), lapsed)
    }

    pub async fn set_flow(&self, chat_id: ChatId, flow: Flow) {
        self.update(chat_id, |current| *current = flow).await;
    }

    pub async fn reset(&self, chat_id: ChatId) {
        self.set_flow(chat_id, Flow::Idle).await;
    }

    /// Mutates the chat's flow in place under the table lock, creating an
    /// idle record first if needed.
    pub async fn update<R>(&self, chat_id: ChatId, f: impl FnOnce(&mut Flow) -> R) -> R {
        let mut table = self.inner.lock().await;
        let record = table.entry(chat_id).or_insert_with(SessionRecord::new);
        record.last_activity = Instant::now();
        f(&mut record.flow)
    }
}
