//! A populated, clock-free session registry for exercising the orchestrator
//! or the HTTP surface without a running database (SPEC_FULL.md §0.4).

use sessions::Registry;

/// A fresh [`Registry`] with one active session already created for
/// `client_id`/`session_id`, left for the caller to configure further via
/// `Registry::update`.
pub fn fake_registry(client_id: &str, session_id: &str) -> Registry {
    let registry = Registry::new();
    registry.create(client_id, session_id).expect("fresh registry, session id not yet taken");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessions::SessionState;

    #[test]
    fn fake_registry_starts_active() {
        let registry = fake_registry("client-a", "session-a");
        let session = registry.get("session-a").expect("just created");
        assert_eq!(session.state, SessionState::Active);
    }
}
