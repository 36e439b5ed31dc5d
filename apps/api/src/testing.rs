//! Test doubles for the text-generation capability and the history store.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ChatMessage, GenerationOptions, LlmError, TextGenerator};
use crate::session::state::{PersistedSession, Turn};
use crate::session::store::{HistoryStore, StoreError};

#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    /// Call succeeds with no usable text.
    Silent,
    Fail,
    /// Never resolves.
    Hang,
}

/// Scripted generator. Replies are consumed in order; the last one repeats.
#[derive(Default)]
pub struct StubGenerator {
    script: Mutex<VecDeque<StubReply>>,
    calls: AtomicUsize,
    last: Mutex<Option<(Vec<ChatMessage>, GenerationOptions)>>,
}

impl StubGenerator {
    pub fn scripted(replies: Vec<StubReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::scripted(
            replies
                .iter()
                .map(|r| StubReply::Text(r.to_string()))
                .collect(),
        )
    }

    pub fn silent() -> Self {
        Self::scripted(vec![StubReply::Silent])
    }

    pub fn failing() -> Self {
        Self::scripted(vec![StubReply::Fail])
    }

    pub fn hanging() -> Self {
        Self::scripted(vec![StubReply::Hang])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last
            .lock()
            .unwrap()
            .as_ref()
            .map(|(messages, _)| messages.clone())
            .unwrap_or_default()
    }

    pub fn last_options(&self) -> Option<GenerationOptions> {
        self.last.lock().unwrap().as_ref().map(|(_, options)| *options)
    }

    fn next_reply(&self) -> StubReply {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap_or(StubReply::Silent)
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Option<String>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((messages.to_vec(), *options));

        match self.next_reply() {
            StubReply::Text(text) => Ok(Some(text)),
            StubReply::Silent => Ok(None),
            StubReply::Fail => Err(LlmError::Api {
                status: 503,
                message: "stub generator failure".to_string(),
            }),
            StubReply::Hang => std::future::pending().await,
        }
    }
}

/// In-memory history store with failure injection.
#[derive(Default)]
pub struct MemoryHistoryStore {
    sessions: Mutex<HashMap<String, Vec<Turn>>>,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryHistoryStore {
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self, session_id: &str) -> Result<PersistedSession, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected load failure".to_string()));
        }
        Ok(PersistedSession {
            history: self.history(session_id),
        })
    }

    async fn save(&self, session_id: &str, history: &[Turn]) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected save failure".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), history.to_vec());
        Ok(())
    }
}
