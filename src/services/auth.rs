use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub trait Authenticator: Send + Sync {
    fn verify(&self, credentials: &Credentials) -> bool;
}

/// Checks credentials against a single configured account. With no account
/// configured every sign-in is rejected.
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    email: Option<String>,
    password: Option<String>,
}

impl StaticAuthenticator {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self { email, password }
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, credentials: &Credentials) -> bool {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => {
                credentials.email.eq_ignore_ascii_case(email) && &credentials.password == password
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    SignedOut,
    SignedIn {
        email: String,
        token: Uuid,
        signed_in_at: DateTime<Utc>,
    },
}

impl Session {
    pub fn sign_in<A>(&self, credentials: &Credentials, authenticator: &A) -> AppResult<Session>
    where
        A: Authenticator + ?Sized,
    {
        if !authenticator.verify(credentials) {
            return Err(AppError::InvalidCredentials);
        }
        Ok(Session::SignedIn {
            email: credentials.email.clone(),
            token: Uuid::new_v4(),
            signed_in_at: Utc::now(),
        })
    }

    pub fn sign_out(self) -> Session {
        Session::SignedOut
    }

    pub fn token(&self) -> Option<Uuid> {
        match self {
            Session::SignedIn { token, .. } => Some(*token),
            Session::SignedOut => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::SignedIn { .. })
    }
}

/// Live dashboard sessions keyed by bearer token.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub async fn insert(&self, session: Session) {
        if let Some(token) = session.token() {
            self.sessions.write().await.insert(token, session);
        }
    }

    pub async fn get(&self, token: &Uuid) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn remove(&self, token: &Uuid) -> Option<Session> {
        self.sessions.write().await.remove(token)
    }
}
