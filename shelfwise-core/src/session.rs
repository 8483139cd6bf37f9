//! Authenticated session providers

use crate::error::{Result, ShelfError};
use crate::types::UserId;
use std::sync::{Arc, RwLock};

/// Supplies the currently signed-in user
pub trait SessionProvider: Send + Sync {
    /// The active user, or `None` when nobody is signed in
    fn current_user(&self) -> Option<UserId>;

    /// The active user, failing with `NotAuthenticated` when absent
    fn require_user(&self) -> Result<UserId> {
        self.current_user().ok_or(ShelfError::NotAuthenticated)
    }
}

/// A session fixed at construction, e.g. one per HTTP request
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<UserId>,
}

impl StaticSession {
    pub fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl From<Option<UserId>> for StaticSession {
    fn from(user: Option<UserId>) -> Self {
        Self { user }
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

/// A session whose user changes at runtime (sign in / sign out)
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    user: Arc<RwLock<Option<UserId>>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: UserId) {
        tracing::info!("signed in as {}", user);
        if let Ok(mut current) = self.user.write() {
            *current = Some(user);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut current) = self.user.write() {
            if let Some(user) = current.take() {
                tracing::info!("signed out {}", user);
            }
        }
    }
}

impl SessionProvider for SharedSession {
    fn current_user(&self) -> Option<UserId> {
        self.user.read().ok().and_then(|u| u.clone())
    }
}
