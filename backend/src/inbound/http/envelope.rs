//! Success envelopes returned by the user handlers.
//!
//! Data-bearing responses use `{"code": 200, "data": ...}`; acknowledgements
//! use `{"code": 200, "msg": ...}`. Each handler names the exact payload type
//! it returns, so the set of response shapes is closed.

use serde::Serialize;

use crate::domain::{Permission, User, UserId};

/// Wire code carried by every success envelope.
pub const SUCCESS_CODE: u32 = 200;

/// `{"code": 200, "data": T}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    code: u32,
    data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload in the success envelope.
    pub const fn new(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            data,
        }
    }

    /// Borrow the wrapped payload.
    pub const fn data(&self) -> &T {
        &self.data
    }
}

/// Acknowledgement messages for mutations that return no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMessage {
    /// Edits and department moves.
    UpdateDone,
    /// Deletions.
    DeletedDone,
}

impl AckMessage {
    /// Message text placed in the envelope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpdateDone => "update done",
            Self::DeletedDone => "deleted done",
        }
    }
}

/// `{"code": 200, "msg": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    code: u32,
    msg: &'static str,
}

impl Ack {
    /// Acknowledge a completed update.
    #[must_use]
    pub const fn update_done() -> Self {
        Self::new(AckMessage::UpdateDone)
    }

    /// Acknowledge a completed deletion.
    #[must_use]
    pub const fn deleted_done() -> Self {
        Self::new(AckMessage::DeletedDone)
    }

    const fn new(message: AckMessage) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: message.as_str(),
        }
    }
}

/// Single user lookup payload: `{"result": User}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResult {
    pub result: User,
}

/// Creation payload: `{"id": <new id>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedUser {
    pub id: UserId,
}

/// Permission payload: `{"result": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionList {
    pub result: Vec<Permission>,
}
