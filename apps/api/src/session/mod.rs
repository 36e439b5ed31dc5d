// Chat sessions: one actor per session id, driving the init → refine workflow
// over a WebSocket. Only conversation history survives an actor restart.

pub mod actor;
pub mod error;
pub mod handlers;
pub mod machine;
pub mod protocol;
pub mod router;
pub mod state;
pub mod store;
