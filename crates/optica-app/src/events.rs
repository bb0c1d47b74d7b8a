//! Session transition events.
//!
//! Cross-store coordination is explicit: the session store broadcasts a
//! transition event, and the bootstrap subscriber issues the matching
//! wishlist partition switch. Nothing depends on incidental call
//! ordering in shell code.

use tokio::sync::broadcast;

/// A session state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user authenticated (possibly replacing a previous session).
    LoggedIn { user_id: String },
    /// The session was cleared.
    LoggedOut,
}

/// Channel capacity for session events. Transitions are rare (login,
/// logout); a small ring is plenty, and a lagged subscriber just
/// re-reads the session snapshot.
const EVENT_CAPACITY: usize = 16;

pub(crate) fn session_event_channel() -> broadcast::Sender<SessionEvent> {
    broadcast::channel(EVENT_CAPACITY).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_reach_subscriber() {
        let tx = session_event_channel();
        let mut rx = tx.subscribe();

        tx.send(SessionEvent::LoggedIn {
            user_id: "u1".to_string(),
        })
        .unwrap();
        tx.send(SessionEvent::LoggedOut).unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::LoggedIn {
                user_id: "u1".to_string()
            }
        );
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn test_send_without_subscribers_is_not_an_error_path() {
        let tx = session_event_channel();
        // send returns Err when no receiver exists; callers ignore it.
        assert!(tx.send(SessionEvent::LoggedOut).is_err());
    }
}
