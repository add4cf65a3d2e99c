//! Component F: the process-wide session registry, protected by a single
//! mutex (spec.md §4.F). One `Registry` is shared as an `Arc` across the
//! HTTP surface and the orchestrator.

use crate::error::SessionError;
use crate::models::{Session, SessionState};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct Registry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { sessions: Mutex::new(HashMap::new()) }
    }

    /// Creates a session in state `Active`, demoting any previous Active
    /// session of the same client to `Inactive` (spec.md §4.F `create`).
    pub fn create(&self, client_id: &str, session_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(session_id) {
            return Err(SessionError::already_exists(format!("session '{session_id}' already exists")));
        }
        for session in sessions.values_mut() {
            if session.client_id == client_id && session.state == SessionState::Active {
                session.state = SessionState::Inactive;
            }
        }
        sessions.insert(session_id.to_string(), Session::new(client_id, session_id));
        Ok(())
    }

    pub fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::not_found(format!("session '{session_id}' not found")))?;
        if matches!(session.state, SessionState::Migrating | SessionState::Aborting) {
            return Err(SessionError::invalid_transition(format!(
                "session '{session_id}' cannot be deleted while {:?}",
                session.state
            )));
        }
        sessions.remove(session_id);
        Ok(())
    }

    /// Sets a session active or inactive, demoting any sibling Active
    /// session of the same client when activating (spec.md §4.F
    /// `set_active`).
    pub fn set_active(&self, session_id: &str, active: bool) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock();
        let client_id = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::not_found(format!("session '{session_id}' not found")))?
            .client_id
            .clone();

        if active {
            for (id, session) in sessions.iter_mut() {
                if session.client_id == client_id && id != session_id && session.state == SessionState::Active {
                    session.state = SessionState::Inactive;
                }
            }
        }

        let session = sessions.get_mut(session_id).expect("checked above");
        session.state = if active { SessionState::Active } else { SessionState::Inactive };
        Ok(())
    }

    /// Requests cancellation of a running migration (spec.md §4.F `abort`):
    /// only valid from `Migrating`, transitions to `Aborting`.
    pub fn abort(&self, session_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::not_found(format!("session '{session_id}' not found")))?;
        if session.state != SessionState::Migrating {
            return Err(SessionError::invalid_transition(format!(
                "session '{session_id}' is {:?}, not Migrating",
                session.state
            )));
        }
        session.state = SessionState::Aborting;
        session.cancel.cancel();
        Ok(())
    }

    /// True iff the session is `Aborting`; records an observation error on
    /// the session regardless (spec.md §4.F `assert_abort`: "returns true
    /// iff state = Aborting; records an error").
    pub fn assert_abort(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(session_id) else { return false };
        let aborting = session.state == SessionState::Aborting;
        if aborting {
            session.errors.push(format!("migration in session '{session_id}' aborted on request"));
        }
        aborting
    }

    pub fn get_active(&self, client_id: &str) -> Option<Session> {
        let sessions = self.sessions.lock();
        sessions.values().find(|s| s.client_id == client_id && s.state == SessionState::Active).cloned()
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.lock().get(session_id).cloned()
    }

    /// Mutates a session under the registry's lock, returning whatever `f`
    /// returns. Used by the orchestrator to advance state/counters as a
    /// migration progresses.
    pub fn update<R>(&self, session_id: &str, f: impl FnOnce(&mut Session) -> R) -> Result<R, SessionError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::not_found(format!("session '{session_id}' not found")))?;
        Ok(f(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_demotes_a_previous_active_session_of_the_same_client() {
        let registry = Registry::new();
        registry.create("alice", "s1").unwrap();
        registry.create("alice", "s2").unwrap();
        assert_eq!(registry.get("s1").unwrap().state, SessionState::Inactive);
        assert_eq!(registry.get("s2").unwrap().state, SessionState::Active);
    }

    #[test]
    fn create_rejects_a_duplicate_session_id() {
        let registry = Registry::new();
        registry.create("alice", "s1").unwrap();
        assert!(matches!(registry.create("bob", "s1"), Err(SessionError::AlreadyExists { .. })));
    }

    #[test]
    fn abort_requires_migrating_state() {
        let registry = Registry::new();
        registry.create("alice", "s1").unwrap();
        assert!(matches!(registry.abort("s1"), Err(SessionError::InvalidTransition { .. })));

        registry.update("s1", |s| s.state = SessionState::Migrating).unwrap();
        registry.abort("s1").unwrap();
        assert_eq!(registry.get("s1").unwrap().state, SessionState::Aborting);
    }

    #[test]
    fn assert_abort_records_an_error_and_reports_true_only_while_aborting() {
        let registry = Registry::new();
        registry.create("alice", "s1").unwrap();
        assert!(!registry.assert_abort("s1"));

        registry.update("s1", |s| s.state = SessionState::Migrating).unwrap();
        registry.abort("s1").unwrap();
        assert!(registry.assert_abort("s1"));
        assert_eq!(registry.get("s1").unwrap().errors.len(), 1);
    }

    #[test]
    fn get_active_finds_the_right_clients_session() {
        let registry = Registry::new();
        registry.create("alice", "s1").unwrap();
        registry.create("bob", "s2").unwrap();
        assert_eq!(registry.get_active("bob").unwrap().session_id, "s2");
    }

    #[test]
    fn delete_refuses_while_migrating() {
        let registry = Registry::new();
        registry.create("alice", "s1").unwrap();
        registry.update("s1", |s| s.state = SessionState::Migrating).unwrap();
        assert!(matches!(registry.delete("s1"), Err(SessionError::InvalidTransition { .. })));
    }
}
