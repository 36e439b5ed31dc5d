//! Session Actor: one tokio task per session id.
//!
//! The actor owns the session's state and its single live connection, and
//! drains its mailbox strictly one command at a time. That loop is the only
//! serialization mechanism: no lock ever guards session state.
//!
//! Lifecycle:
//! - `Connect` rehydrates history from the store and greets the client. A
//!   newer connection supersedes the current one.
//! - `Frame` runs one state machine transition and emits its reply.
//! - `Disconnect` of the live connection releases the actor from the router
//!   and closes the mailbox. Commands already queued still drain, but any
//!   late `Connect` is refused so the caller retries on a fresh actor.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::session::error::SessionError;
use crate::session::machine::{handle_frame, SessionContext};
use crate::session::protocol::ServerMessage;
use crate::session::router::SessionRegistry;
use crate::session::state::SessionState;

const MAILBOX_CAPACITY: usize = 32;
/// How long a reply may wait for room in a client's outbound queue.
const OUTBOUND_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub type ConnectionId = u64;

pub(crate) enum SessionCommand {
    Connect {
        outbound: mpsc::Sender<ServerMessage>,
        reply: oneshot::Sender<Result<ConnectionId, SessionError>>,
    },
    Frame {
        connection: ConnectionId,
        frame: String,
        done: oneshot::Sender<Result<(), SessionError>>,
    },
    Disconnect {
        connection: ConnectionId,
    },
    #[cfg(test)]
    Snapshot {
        reply: oneshot::Sender<Option<SessionState>>,
    },
}

/// Address of a running session actor.
#[derive(Clone)]
pub struct SessionHandle {
    instance: u64,
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Identifies the actor instance; a respawn for the same session id gets a new one.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Attaches a client. The greeting is queued on `outbound` before this returns.
    pub async fn connect(
        &self,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<ConnectionId, SessionError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(SessionCommand::Connect { outbound, reply })
            .await
            .map_err(|_| SessionError::ActorUnavailable)?;
        response.await.map_err(|_| SessionError::ActorUnavailable)?
    }

    /// Hands one inbound frame to the actor and waits until it is fully processed.
    pub async fn deliver(&self, connection: ConnectionId, frame: String) -> Result<(), SessionError> {
        let (done, processed) = oneshot::channel();
        self.tx
            .send(SessionCommand::Frame {
                connection,
                frame,
                done,
            })
            .await
            .map_err(|_| SessionError::ActorUnavailable)?;
        processed.await.map_err(|_| SessionError::ActorUnavailable)?
    }

    pub async fn disconnect(&self, connection: ConnectionId) {
        if self
            .tx
            .send(SessionCommand::Disconnect { connection })
            .await
            .is_err()
        {
            debug!(connection, "Session actor already stopped before disconnect");
        }
    }

    #[cfg(test)]
    pub async fn snapshot(&self) -> Option<SessionState> {
        let (reply, response) = oneshot::channel();
        self.tx.send(SessionCommand::Snapshot { reply }).await.ok()?;
        response.await.ok().flatten()
    }
}

struct Connection {
    id: ConnectionId,
    outbound: mpsc::Sender<ServerMessage>,
    state: SessionState,
}

pub(crate) struct SessionActor {
    ctx: SessionContext,
    instance: u64,
    registry: SessionRegistry,
    connection: Option<Connection>,
    next_connection: ConnectionId,
    draining: bool,
}

impl SessionActor {
    /// Spawns the actor task and returns its handle.
    pub(crate) fn spawn(ctx: SessionContext, instance: u64, registry: SessionRegistry) -> SessionHandle {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = SessionActor {
            ctx,
            instance,
            registry,
            connection: None,
            next_connection: 1,
            draining: false,
        };
        tokio::spawn(actor.run(rx));
        SessionHandle { instance, tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        info!(session_id = %self.ctx.session_id, instance = self.instance, "Session actor started");

        while let Some(command) = rx.recv().await {
            match command {
                SessionCommand::Connect { outbound, reply } => {
                    if self.draining {
                        // Dropping `reply` tells the caller to resolve a fresh actor.
                        continue;
                    }
                    let result = self.attach(outbound).await;
                    let _ = reply.send(result);
                    if self.connection.is_none() {
                        self.release(&mut rx);
                    }
                }
                SessionCommand::Frame {
                    connection,
                    frame,
                    done,
                } => {
                    let result = self.process(connection, &frame).await;
                    let _ = done.send(result);
                }
                SessionCommand::Disconnect { connection } => {
                    if self.connection.as_ref().map(|c| c.id) == Some(connection) {
                        self.connection = None;
                        info!(session_id = %self.ctx.session_id, connection, "Connection closed");
                        self.release(&mut rx);
                    }
                }
                #[cfg(test)]
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.connection.as_ref().map(|c| c.state.clone()));
                }
            }
        }

        info!(session_id = %self.ctx.session_id, instance = self.instance, "Session actor stopped");
    }

    async fn attach(
        &mut self,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<ConnectionId, SessionError> {
        let persisted = self.ctx.store.load(&self.ctx.session_id).await.map_err(|e| {
            warn!(session_id = %self.ctx.session_id, "Failed to load history: {e}");
            SessionError::from(e)
        })?;

        if let Some(previous) = self.connection.take() {
            info!(
                session_id = %self.ctx.session_id,
                connection = previous.id,
                "Connection superseded by a newer one"
            );
            // A stalled old client must not hold up the new one.
            if previous
                .outbound
                .try_send(ServerMessage::error(SessionError::Superseded.to_string()))
                .is_err()
            {
                debug!(
                    session_id = %self.ctx.session_id,
                    connection = previous.id,
                    "Superseded connection not reading; notice dropped"
                );
            }
        }

        let id = self.next_connection;
        self.next_connection += 1;

        let state = SessionState::rehydrate(persisted);
        info!(
            session_id = %self.ctx.session_id,
            connection = id,
            history_len = state.history().len(),
            "Connection established"
        );

        if outbound.send(ServerMessage::greeting()).await.is_err() {
            debug!(session_id = %self.ctx.session_id, "Client left before greeting");
        }
        self.connection = Some(Connection {
            id,
            outbound,
            state,
        });
        Ok(id)
    }

    async fn process(&mut self, connection: ConnectionId, frame: &str) -> Result<(), SessionError> {
        let Some(live) = self.connection.as_mut().filter(|c| c.id == connection) else {
            return Err(SessionError::Superseded);
        };

        let reply = handle_frame(&mut live.state, frame, &self.ctx).await;
        match tokio::time::timeout(OUTBOUND_SEND_TIMEOUT, live.outbound.send(reply)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => {
                debug!(session_id = %self.ctx.session_id, connection, "Reply dropped: client gone");
                Ok(())
            }
            Err(_) => {
                warn!(session_id = %self.ctx.session_id, connection, "Client stopped reading; reply dropped");
                Err(SessionError::ClientStalled)
            }
        }
    }

    /// Leaves the router and stops accepting new commands once idle.
    fn release(&mut self, rx: &mut mpsc::Receiver<SessionCommand>) {
        if self.draining || self.connection.is_some() {
            return;
        }
        self.draining = true;
        self.registry
            .remove_if(&self.ctx.session_id, |_, handle| handle.instance == self.instance);
        rx.close();
        debug!(session_id = %self.ctx.session_id, instance = self.instance, "Session actor released");
    }
}
