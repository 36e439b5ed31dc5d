//! JSON frames exchanged over the chat WebSocket.

use serde::{Deserialize, Serialize};

use crate::listing::JobListing;

/// Greeting sent on every new connection.
pub const GREETING: &str = "Connected to AI Resume Optimizer. Please provide your resume, \
job listing, and any additional information to get started.";

/// Incoming WebSocket messages
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "init")]
    Init {
        resume: String,
        #[serde(rename = "jobListing")]
        job_listing: JobListing,
        #[serde(rename = "additionalInfo", default)]
        additional_info: Option<String>,
    },

    #[serde(rename = "chat")]
    Chat { message: String },

    /// Any `type` this server does not know.
    #[serde(other)]
    Unknown,
}

/// Outgoing WebSocket messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    System { message: String },
    OptimizedResume { content: String },
    ChatResponse { content: String },
    Error { message: String },
}

impl ServerMessage {
    pub fn greeting() -> Self {
        ServerMessage::System {
            message: GREETING.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_frame_deserializes() {
        let frame = r#"{
            "type": "init",
            "resume": "\\documentclass{article}",
            "jobListing": "Backend Engineer, Go, Kubernetes",
            "additionalInfo": ""
        }"#;
        let ClientMessage::Init {
            resume,
            job_listing,
            additional_info,
        } = serde_json::from_str(frame).unwrap()
        else {
            panic!("expected init");
        };
        assert_eq!(resume, "\\documentclass{article}");
        assert_eq!(
            job_listing,
            JobListing::Text("Backend Engineer, Go, Kubernetes".to_string())
        );
        assert_eq!(additional_info.as_deref(), Some(""));
    }

    #[test]
    fn test_init_without_additional_info() {
        let frame = r#"{"type": "init", "resume": "r", "jobListing": "j"}"#;
        let message: ClientMessage = serde_json::from_str(frame).unwrap();
        assert!(matches!(
            message,
            ClientMessage::Init {
                additional_info: None,
                ..
            }
        ));
    }

    #[test]
    fn test_chat_frame_deserializes() {
        let frame = r#"{"type": "chat", "message": "Add Kubernetes"}"#;
        let message: ClientMessage = serde_json::from_str(frame).unwrap();
        assert!(matches!(message, ClientMessage::Chat { message } if message == "Add Kubernetes"));
    }

    #[test]
    fn test_unknown_type_maps_to_unknown() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type": "ping", "extra": 1}"#).unwrap();
        assert!(matches!(message, ClientMessage::Unknown));
    }

    #[test]
    fn test_missing_fields_fail_to_decode() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "chat"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"message": "hi"}"#).is_err());
    }

    #[test]
    fn test_server_message_wire_shapes() {
        let cases = [
            (ServerMessage::greeting(), "system"),
            (
                ServerMessage::OptimizedResume {
                    content: "x".to_string(),
                },
                "optimized_resume",
            ),
            (
                ServerMessage::ChatResponse {
                    content: "x".to_string(),
                },
                "chat_response",
            ),
            (ServerMessage::error("boom"), "error"),
        ];
        for (message, expected_type) in cases {
            let json = serde_json::to_value(&message).unwrap();
            assert_eq!(json["type"], expected_type);
        }

        let error = serde_json::to_value(ServerMessage::error("boom")).unwrap();
        assert_eq!(error, serde_json::json!({"type": "error", "message": "boom"}));
    }
}
