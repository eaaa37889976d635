//! JSON-shaped responses returned across the boundary.

use crate::config::ReplyConfig;
use crate::error::Error;
use serde::Serialize;

/// Last-resort body if serialization ever fails.
const FALLBACK_ERROR: &str = r#"{"error":"Failed to process request"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success(Reply),
    Failure(ErrorReply),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub status: String,
    pub agent: String,
    pub version: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl Response {
    #[cfg(test)]
    pub(crate) fn is_error(&self) -> bool {
        matches!(self, Response::Failure(_))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize response: {}", e);
            FALLBACK_ERROR.to_string()
        })
    }
}

impl From<Error> for Response {
    fn from(err: Error) -> Self {
        Response::Failure(ErrorReply {
            error: err.to_string(),
        })
    }
}

/// Turns a decoded request into a response.
///
/// Implementations run while the boundary lock is held and must not call back
/// into the boundary.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &str) -> Response;
}

/// Answers every request with the same configured reply.
#[derive(Debug, Clone)]
pub struct StaticReply {
    reply: Reply,
}

impl StaticReply {
    pub fn new(config: &ReplyConfig) -> Self {
        Self {
            reply: Reply {
                status: "success".to_string(),
                agent: config.agent.clone(),
                version: config.version.clone(),
                response: config.message.clone(),
            },
        }
    }
}

impl Default for StaticReply {
    fn default() -> Self {
        Self::new(&ReplyConfig::default())
    }
}

impl Handler for StaticReply {
    fn handle(&self, _request: &str) -> Response {
        Response::Success(self.reply.clone())
    }
}
