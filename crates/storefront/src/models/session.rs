//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use keyzone_core::{BearerToken, UserId, UserRole};

use crate::marketplace::LoginResponse;

/// Session-stored user identity.
///
/// Holds the marketplace bearer token; the browser only ever sees the
/// session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Marketplace user id.
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Token attached to every authenticated API call.
    pub token: BearerToken,
}

impl CurrentUser {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name for the header greeting.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

impl From<LoginResponse> for CurrentUser {
    fn from(login: LoginResponse) -> Self {
        Self {
            id: login.user.id,
            username: login.user.username,
            email: login.user.email,
            role: login.user.role,
            token: login.token,
        }
    }
}

/// Kind of one-shot banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    /// CSS class for the alert banner.
    #[must_use]
    pub const fn alert_class(&self) -> &'static str {
        match self {
            Self::Success => "alert alert-success",
            Self::Error => "alert alert-error",
            Self::Info => "alert alert-info",
        }
    }
}

/// A message shown once on the next rendered page (post/redirect/get).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn alert_class(&self) -> &'static str {
        self.kind.alert_class()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the pending one-shot banner.
    pub const FLASH: &str = "flash";
}
