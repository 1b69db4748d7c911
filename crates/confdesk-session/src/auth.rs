//! Authentication handshake types
//!
//! ```text
//! Idle
//!   ↓ POST auth (login, password, type)
//! AwaitingAuthHash
//!   ↓ code == "200", POST token (auth_hash)
//! AwaitingToken
//!   ↓ code == "200"
//! Authenticated
//! ```
//!
//! A non-success code at either step ends in `Rejected`; a transport
//! failure at either step ends in `Failed`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SessionError;
use crate::Result;

/// The only `code` value treated as success. Compared as a string, never as a number.
pub const SUCCESS_CODE: &str = "200";

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub login: String,
    pub password: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl LoginData {
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            kind: kind.into(),
        }
    }
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginData")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredentials {
    pub token: String,
    pub u_hash: String,
}

impl SessionCredentials {
    pub fn new(token: impl Into<String>, u_hash: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            u_hash: u_hash.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Idle,
    AwaitingAuthHash,
    AwaitingToken,
    Authenticated,
    Rejected,
    Failed,
}

impl AuthState {
    pub fn can_transition_to(&self, target: AuthState) -> bool {
        match (self, target) {
            (AuthState::Idle, AuthState::AwaitingAuthHash) => true,
            (AuthState::AwaitingAuthHash, AuthState::AwaitingToken) => true,
            (AuthState::AwaitingAuthHash, AuthState::Rejected) => true,
            (AuthState::AwaitingAuthHash, AuthState::Failed) => true,
            (AuthState::AwaitingToken, AuthState::Authenticated) => true,
            (AuthState::AwaitingToken, AuthState::Rejected) => true,
            (AuthState::AwaitingToken, AuthState::Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AuthState::Authenticated | AuthState::Rejected | AuthState::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Idle => "idle",
            AuthState::AwaitingAuthHash => "awaiting_auth_hash",
            AuthState::AwaitingToken => "awaiting_token",
            AuthState::Authenticated => "authenticated",
            AuthState::Rejected => "rejected",
            AuthState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a completed handshake. Serializes as
/// `{"status":"success"}` or `{"status":"error","message":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum AuthOutcome {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "error")]
    Rejected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success => None,
            AuthOutcome::Rejected { message } => message.as_deref(),
        }
    }
}

/// Tracks one handshake through its states
#[derive(Debug)]
pub(crate) struct Handshake<'a> {
    tenant_id: &'a str,
    state: AuthState,
}

impl<'a> Handshake<'a> {
    pub(crate) fn new(tenant_id: &'a str) -> Self {
        Self {
            tenant_id,
            state: AuthState::Idle,
        }
    }

    pub(crate) fn state(&self) -> AuthState {
        self.state
    }

    pub(crate) fn advance(&mut self, target: AuthState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(SessionError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }

        tracing::debug!(
            tenant_id = %self.tenant_id,
            from = %self.state,
            to = %target,
            "Auth handshake transition"
        );
        self.state = target;
        Ok(())
    }
}

/// Reply from `POST {base}auth`
#[derive(Debug, Deserialize)]
pub(crate) struct AuthReply {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub auth_hash: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

/// Reply from `POST {base}token`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenReply {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

pub(crate) fn is_success_code(code: Option<&Value>) -> bool {
    matches!(code, Some(Value::String(s)) if s == SUCCESS_CODE)
}

/// Server message as shown to the user. Non-string messages keep their JSON text.
pub(crate) fn message_text(message: Option<&Value>) -> Option<String> {
    match message? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl AuthReply {
    pub(crate) fn is_success(&self) -> bool {
        is_success_code(self.code.as_ref())
    }

    pub(crate) fn rejection(&self) -> AuthOutcome {
        AuthOutcome::Rejected {
            message: message_text(self.message.as_ref()),
        }
    }

    pub(crate) fn auth_hash(&self) -> Result<String> {
        match &self.auth_hash {
            Some(Value::String(hash)) => Ok(hash.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(SessionError::MalformedResponse {
                step: "auth",
                reason: "missing auth_hash".to_string(),
            }),
        }
    }
}

impl TokenReply {
    pub(crate) fn is_success(&self) -> bool {
        is_success_code(self.code.as_ref())
    }

    pub(crate) fn rejection(&self) -> AuthOutcome {
        AuthOutcome::Rejected {
            message: message_text(self.message.as_ref()),
        }
    }

    pub(crate) fn credentials(self) -> Result<SessionCredentials> {
        let data = self.data.ok_or_else(|| SessionError::MalformedResponse {
            step: "token",
            reason: "missing data".to_string(),
        })?;

        serde_json::from_value(data).map_err(|e| SessionError::MalformedResponse {
            step: "token",
            reason: e.to_string(),
        })
    }
}
