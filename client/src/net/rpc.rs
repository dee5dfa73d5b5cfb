//! Team remote procedures.
//!
//! The procedures (`create_team`, `join_team_by_code`, `get_user_current_team`)
//! live in the hosted relational backend. This module only forwards arguments
//! verbatim and turns the reply into a typed result. Duplicate joins, code
//! matching, and capacity limits are decided remotely; their messages are
//! surfaced unmodified.
//!
//! ERROR HANDLING
//! ==============
//! Replies are parsed into `Reply<T>` before use. A remote failure becomes
//! `RpcError::Remote(message)`; a shape we cannot read becomes
//! `RpcError::Malformed`. Nothing is retried.

#[cfg(test)]
#[path = "rpc_test.rs"]
mod rpc_test;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::http::{self, HttpReply, Method};
use super::types::{Team, TeamMembership};
use crate::auth::session::Session;
use crate::config::PublicConfig;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("backend not configured")]
    NotConfigured,
    #[error("network error: {0}")]
    Transport(String),
    /// Failure reported by the procedure; the message is shown as-is.
    #[error("{0}")]
    Remote(String),
    #[error("unexpected reply: {0}")]
    Malformed(String),
}

/// Tagged view of a procedure reply.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply<T> {
    Success(Option<T>),
    Failure(String),
}

const MESSAGE_KEYS: [&str; 3] = ["message", "error", "msg"];
const PAYLOAD_KEYS: [&str; 4] = ["data", "team", "membership", "result"];

fn message_of(object: &serde_json::Map<String, Value>) -> Option<String> {
    MESSAGE_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(ToOwned::to_owned)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<Option<T>, RpcError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => match items.into_iter().next() {
            None => Ok(None),
            Some(first) => decode(first),
        },
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(|e| RpcError::Malformed(e.to_string())),
    }
}

/// Classify a successful (2xx) reply body.
///
/// # Errors
///
/// Returns `Malformed` when the body is neither a row, a list of rows, nor a
/// `{ success, message, data }` envelope.
pub fn parse_reply<T: DeserializeOwned>(body: &str) -> Result<Reply<T>, RpcError> {
    if body.trim().is_empty() {
        return Ok(Reply::Success(None));
    }
    let value: Value = serde_json::from_str(body).map_err(|e| RpcError::Malformed(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return decode(value).map(Reply::Success);
    };

    if let Some(flag) = object.get("success").and_then(Value::as_bool) {
        if !flag {
            let message = message_of(&object).unwrap_or_else(|| "request failed".to_owned());
            return Ok(Reply::Failure(message));
        }
        // A confirmed success stays a success even when it carries no
        // readable payload (e.g. only a message).
        let payload = PAYLOAD_KEYS
            .iter()
            .find_map(|key| object.remove(*key))
            .unwrap_or(Value::Object(object));
        return Ok(Reply::Success(decode(payload).unwrap_or_else(|e| {
            log::debug!("rpc success without usable payload: {e}");
            None
        })));
    }

    let fallback = message_of(&object);
    match decode::<T>(Value::Object(object)) {
        Ok(parsed) => Ok(Reply::Success(parsed)),
        Err(e) => fallback.map(Reply::Failure).ok_or(e),
    }
}

fn into_result<T: DeserializeOwned>(reply: &HttpReply) -> Result<Option<T>, RpcError> {
    if !reply.ok() {
        return Err(RpcError::Remote(http::error_message(reply)));
    }
    match parse_reply(&reply.body)? {
        Reply::Success(value) => Ok(value),
        Reply::Failure(message) => Err(RpcError::Remote(message)),
    }
}

/// Caller-scoped handle for the team procedures.
#[derive(Clone, Debug)]
pub struct TeamsApi {
    config: PublicConfig,
    access_token: String,
}

impl TeamsApi {
    #[must_use]
    pub fn new(config: PublicConfig, session: &Session) -> Self {
        Self { config, access_token: session.access_token.clone() }
    }

    pub(crate) fn procedure_url(&self, name: &str) -> String {
        self.config.endpoint(&format!("rest/v1/rpc/{name}"))
    }

    async fn call<T: DeserializeOwned>(&self, name: &str, args: &Value) -> Result<Option<T>, RpcError> {
        if !self.config.is_configured() {
            return Err(RpcError::NotConfigured);
        }
        let headers = [
            ("apikey", self.config.supabase_anon_key.clone()),
            ("Authorization", format!("Bearer {}", self.access_token)),
        ];
        let reply = http::send(Method::Post, &self.procedure_url(name), &headers, Some(args))
            .await
            .map_err(RpcError::Transport)?;
        let result = into_result(&reply);
        if let Err(e) = &result {
            log::warn!("rpc {name} failed: {e}");
        }
        result
    }

    /// `Ok(None)` when the procedure confirms success without returning the row.
    ///
    /// # Errors
    ///
    /// Remote failure (e.g. name or code taken) or an unreadable reply.
    pub async fn create_team(&self, name: &str, code: &str, creator_id: Uuid) -> Result<Option<Team>, RpcError> {
        let args = serde_json::json!({ "name": name, "code": code, "creator_id": creator_id });
        self.call::<Team>("create_team", &args).await
    }

    /// `Ok(None)` when the procedure confirms the join without returning the
    /// membership.
    ///
    /// # Errors
    ///
    /// Remote failure (unknown code, already a member, team full, ...) with
    /// the procedure's message, or an unreadable reply.
    pub async fn join_team_by_code(&self, code: &str, user_id: Uuid) -> Result<Option<TeamMembership>, RpcError> {
        let args = serde_json::json!({ "code": code, "user_id": user_id });
        self.call::<TeamMembership>("join_team_by_code", &args).await
    }

    /// `Ok(None)` when the user has no team yet.
    ///
    /// # Errors
    ///
    /// Remote failure or an unreadable reply.
    pub async fn get_user_current_team(&self, user_id: Uuid) -> Result<Option<Team>, RpcError> {
        let args = serde_json::json!({ "user_id": user_id });
        self.call::<Team>("get_user_current_team", &args).await
    }
}
