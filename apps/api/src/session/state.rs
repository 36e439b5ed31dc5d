//! Session state, split into the durable tier (conversation history) and
//! the volatile tier (phase, inputs, current draft).
//!
//! Only `PersistedSession` is ever written to or read from the history store.
//! `SessionState::rehydrate` is the one place a session is rebuilt, and it
//! always starts the volatile tier from scratch.

use serde::{Deserialize, Serialize};

use crate::llm_client::{ChatMessage, Role};
use crate::tailoring::TailoringInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One role-tagged message in a session's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        ChatMessage {
            role: match turn.role {
                TurnRole::User => Role::User,
                TurnRole::Assistant => Role::Assistant,
            },
            content: turn.content.clone(),
        }
    }
}

/// AWAITING_INIT → DRAFTING → READY. READY is terminal for an actor instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    AwaitingInit,
    Drafting,
    Ready,
}

/// Durable tier. Outlives the actor; rewritten wholesale after every append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub history: Vec<Turn>,
}

/// Volatile tier. Lost whenever the connection or actor goes away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeSession {
    pub phase: Phase,
    pub inputs: Option<TailoringInputs>,
    pub current_draft: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub persisted: PersistedSession,
    pub runtime: RuntimeSession,
}

impl SessionState {
    /// Rebuilds a session from its durable tier only.
    pub fn rehydrate(persisted: PersistedSession) -> Self {
        Self {
            persisted,
            runtime: RuntimeSession::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.runtime.phase
    }

    pub fn history(&self) -> &[Turn] {
        &self.persisted.history
    }

    pub fn current_draft(&self) -> Option<&str> {
        self.runtime.current_draft.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rehydrate_restores_history_only() {
        let persisted = PersistedSession {
            history: vec![Turn::assistant("draft"), Turn::user("tweak it")],
        };
        let state = SessionState::rehydrate(persisted.clone());

        assert_eq!(state.persisted, persisted);
        assert_eq!(state.phase(), Phase::AwaitingInit);
        assert!(state.runtime.inputs.is_none());
        assert!(state.current_draft().is_none());
    }

    #[test]
    fn test_turn_wire_shape() {
        let json = serde_json::to_value(Turn::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_turn_converts_to_chat_message() {
        let message = ChatMessage::from(&Turn::assistant("draft"));
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "draft");
    }
}
