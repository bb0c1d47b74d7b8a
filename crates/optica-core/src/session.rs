//! # Authentication Session
//!
//! The session state machine: two states, two transitions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Session State Machine                         │
//! │                                                                 │
//! │                 authenticate(credentials)                       │
//! │   ┌───────────┐ ─────────────────────────► ┌───────────┐        │
//! │   │ LoggedOut │                            │ LoggedIn  │──┐     │
//! │   └───────────┘ ◄───────────────────────── └───────────┘  │     │
//! │        ▲            unauthenticate()            ▲          │     │
//! │        │                                        └──────────┘     │
//! │        │                              authenticate() overwrites  │
//! │   initial state                                                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Token, refresh token, and user id travel together: `LoggedIn` carries
//! all three, `LoggedOut` carries none. A partially-populated session is
//! unrepresentable, which is the whole point of modelling this as an enum
//! rather than three nullable fields.
//!
//! Token refresh, expiry, and network calls live in external
//! collaborators; this type holds whatever values it is handed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The credential triple issued by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Credentials {
    pub token: String,
    pub refresh_token: String,
    pub user_id: String,
}

/// The authenticated-identity state held by the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Session {
    /// No authenticated user. The initial state at first launch.
    #[default]
    LoggedOut,

    /// An authenticated user; all three fields are always present.
    #[serde(rename_all = "camelCase")]
    LoggedIn {
        token: String,
        refresh_token: String,
        user_id: String,
    },
}

impl Session {
    /// Transition into `LoggedIn`, overwriting any previous session.
    pub fn authenticate(&mut self, credentials: Credentials) {
        *self = Session::LoggedIn {
            token: credentials.token,
            refresh_token: credentials.refresh_token,
            user_id: credentials.user_id,
        };
    }

    /// Transition into `LoggedOut` from any state.
    pub fn unauthenticate(&mut self) {
        *self = Session::LoggedOut;
    }

    /// Whether a user is currently authenticated.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::LoggedIn { user_id, .. } => Some(user_id),
            Session::LoggedOut => None,
        }
    }

    /// The access token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::LoggedIn { token, .. } => Some(token),
            Session::LoggedOut => None,
        }
    }

    /// The refresh token, if any.
    pub fn refresh_token(&self) -> Option<&str> {
        match self {
            Session::LoggedIn { refresh_token, .. } => Some(refresh_token),
            Session::LoggedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(user: &str) -> Credentials {
        Credentials {
            token: format!("tok-{user}"),
            refresh_token: format!("ref-{user}"),
            user_id: user.to_string(),
        }
    }

    #[test]
    fn test_initial_state_is_logged_out() {
        let session = Session::default();
        assert!(!session.is_logged_in());
        assert!(session.token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn test_authenticate_sets_all_fields() {
        let mut session = Session::default();
        session.authenticate(creds("u1"));

        // Session atomicity: all three present together, never partially.
        assert!(session.is_logged_in());
        assert_eq!(session.token(), Some("tok-u1"));
        assert_eq!(session.refresh_token(), Some("ref-u1"));
        assert_eq!(session.user_id(), Some("u1"));
    }

    #[test]
    fn test_authenticate_overwrites_existing_session() {
        let mut session = Session::default();
        session.authenticate(creds("u1"));
        session.authenticate(creds("u2"));

        assert_eq!(session.user_id(), Some("u2"));
        assert_eq!(session.token(), Some("tok-u2"));
    }

    #[test]
    fn test_unauthenticate_clears_all_fields() {
        let mut session = Session::default();
        session.authenticate(creds("u1"));
        session.unauthenticate();

        assert!(!session.is_logged_in());
        assert!(session.token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn test_unauthenticate_from_logged_out_is_noop() {
        let mut session = Session::default();
        session.unauthenticate();
        assert_eq!(session, Session::LoggedOut);
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let mut session = Session::default();
        session.authenticate(creds("u1"));

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
