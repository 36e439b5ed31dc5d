//! The session state machine: one inbound frame in, one outbound frame out.
//!
//! | phase          | init                 | chat                 | other  |
//! |----------------|----------------------|----------------------|--------|
//! | AWAITING_INIT  | draft → READY        | error                | error  |
//! | READY          | error                | refine, stay READY   | error  |
//!
//! A failed transition rolls back every change it made (phase, history,
//! draft), so the client can resend the same frame.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::llm_client::{LlmError, TextGenerator};
use crate::session::error::SessionError;
use crate::session::protocol::{ClientMessage, ServerMessage};
use crate::session::state::{Phase, SessionState, Turn};
use crate::session::store::HistoryStore;
use crate::tailoring::document::is_full_document;
use crate::tailoring::drafter::draft_resume;
use crate::tailoring::refiner::refine_resume;
use crate::tailoring::TailoringInputs;

/// Collaborators a session needs to run a transition.
#[derive(Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub llm: Arc<dyn TextGenerator>,
    pub store: Arc<dyn HistoryStore>,
    pub generation_timeout: Duration,
}

impl SessionContext {
    async fn generate_within<F>(&self, call: F) -> Result<String, SessionError>
    where
        F: Future<Output = Result<String, LlmError>>,
    {
        match tokio::time::timeout(self.generation_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(SessionError::GenerationTimedOut(
                self.generation_timeout.as_secs(),
            )),
        }
    }

    async fn persist(&self, state: &SessionState) -> Result<(), SessionError> {
        self.store
            .save(&self.session_id, state.history())
            .await
            .map_err(SessionError::from)
    }
}

/// Handles one raw frame. Never fails: every error becomes an `error` frame.
pub async fn handle_frame(
    state: &mut SessionState,
    frame: &str,
    ctx: &SessionContext,
) -> ServerMessage {
    let result = match serde_json::from_str::<ClientMessage>(frame) {
        Ok(message) => apply(state, message, ctx).await,
        Err(e) => Err(SessionError::from(e)),
    };

    match result {
        Ok(reply) => reply,
        Err(e) => {
            if e.is_protocol_violation() {
                warn!(session_id = %ctx.session_id, phase = ?state.phase(), "Rejected frame: {e}");
            } else {
                error!(session_id = %ctx.session_id, phase = ?state.phase(), "Transition failed: {e}");
            }
            ServerMessage::error(e.to_string())
        }
    }
}

async fn apply(
    state: &mut SessionState,
    message: ClientMessage,
    ctx: &SessionContext,
) -> Result<ServerMessage, SessionError> {
    match message {
        ClientMessage::Init {
            resume,
            job_listing,
            additional_info,
        } => {
            let inputs = TailoringInputs {
                resume,
                job_listing,
                additional_info,
            };
            initialize(state, inputs, ctx).await
        }
        ClientMessage::Chat { message } => chat(state, message, ctx).await,
        ClientMessage::Unknown => Err(SessionError::UnknownMessageType),
    }
}

async fn initialize(
    state: &mut SessionState,
    inputs: TailoringInputs,
    ctx: &SessionContext,
) -> Result<ServerMessage, SessionError> {
    if state.phase() != Phase::AwaitingInit {
        return Err(SessionError::AlreadyInitialized);
    }
    if inputs.job_listing.is_unrecognized() {
        return Err(SessionError::UnrecognizedJobListing);
    }

    state.runtime.phase = Phase::Drafting;
    let checkpoint = state.persisted.history.len();

    let outcome = async {
        let draft = ctx
            .generate_within(draft_resume(ctx.llm.as_ref(), &inputs))
            .await?;
        state.persisted.history.push(Turn::assistant(draft.clone()));
        ctx.persist(state).await?;
        Ok::<_, SessionError>(draft)
    }
    .await;

    match outcome {
        Ok(draft) => {
            state.runtime.inputs = Some(inputs);
            state.runtime.current_draft = Some(draft.clone());
            state.runtime.phase = Phase::Ready;
            info!(
                session_id = %ctx.session_id,
                history_len = state.history().len(),
                "Session initialized with first draft"
            );
            Ok(ServerMessage::OptimizedResume { content: draft })
        }
        Err(e) => {
            state.persisted.history.truncate(checkpoint);
            state.runtime.phase = Phase::AwaitingInit;
            Err(e)
        }
    }
}

async fn chat(
    state: &mut SessionState,
    message: String,
    ctx: &SessionContext,
) -> Result<ServerMessage, SessionError> {
    if state.phase() != Phase::Ready {
        return Err(SessionError::NotInitialized);
    }
    let inputs = state
        .runtime
        .inputs
        .clone()
        .ok_or(SessionError::NotInitialized)?;

    let checkpoint = state.persisted.history.len();
    state.persisted.history.push(Turn::user(message));

    let outcome = async {
        let reply = ctx
            .generate_within(refine_resume(
                ctx.llm.as_ref(),
                state.history(),
                &inputs,
                state.current_draft(),
            ))
            .await?;
        state.persisted.history.push(Turn::assistant(reply.clone()));
        ctx.persist(state).await?;
        Ok::<_, SessionError>(reply)
    }
    .await;

    match outcome {
        Ok(reply) => {
            let revised = is_full_document(&reply);
            if revised {
                state.runtime.current_draft = Some(reply.clone());
            }
            info!(
                session_id = %ctx.session_id,
                history_len = state.history().len(),
                revised,
                "Chat turn completed"
            );
            Ok(ServerMessage::ChatResponse { content: reply })
        }
        Err(e) => {
            state.persisted.history.truncate(checkpoint);
            Err(e)
        }
    }
}
