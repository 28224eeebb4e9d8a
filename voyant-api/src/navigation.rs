use std::sync::Arc;

use tracing::debug;
use voyant_order::NavigationState;

use crate::routes::{guard, GuardDecision, Route};
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Rendered(Route),
    /// Session still loading; the route is remembered and rendered once it resolves.
    Waiting(Route),
    Redirected { from: Route, to: Route },
}

/// In-memory router. Navigation state travels with a single transition and is never
/// written anywhere, so a reload or a typed-in URL arrives with nothing.
pub struct Navigator {
    session: Arc<SessionStore>,
    current: Route,
    state: NavigationState,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            current: Route::Home,
            state: NavigationState::default(),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Direct navigation: typed URL or link without attached data.
    pub fn navigate(&mut self, path: &str) -> NavigationOutcome {
        self.transition(Route::parse(path), NavigationState::default())
    }

    /// Programmatic navigation carrying data to the next view.
    pub fn navigate_with_state(&mut self, route: Route, state: NavigationState) -> NavigationOutcome {
        self.transition(route, state)
    }

    /// Reloading drops whatever state the current view received.
    pub fn reload(&mut self) -> NavigationOutcome {
        let route = self.current.clone();
        self.history.pop();
        self.transition(route, NavigationState::default())
    }

    /// `None` when there is nothing to go back to; the current entry stays put.
    pub fn back(&mut self) -> Option<NavigationOutcome> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        let previous = self.history.pop()?;
        Some(self.transition(previous, NavigationState::default()))
    }

    /// Re-runs the guard on the current route, e.g. after the session finished loading.
    pub fn resolve(&mut self) -> NavigationOutcome {
        let route = self.current.clone();
        let state = std::mem::take(&mut self.state);
        self.history.pop();
        self.transition(route, state)
    }

    fn transition(&mut self, route: Route, state: NavigationState) -> NavigationOutcome {
        let snapshot = self.session.snapshot();
        match guard(&route, &snapshot) {
            GuardDecision::Allow => {
                if route.expects_state() && state.is_empty() {
                    debug!("{} opened without navigation state, fallback view", route);
                } else {
                    debug!("Navigate to {}", route);
                }
                self.enter(route.clone(), state);
                NavigationOutcome::Rendered(route)
            }
            GuardDecision::Pending => {
                self.enter(route.clone(), state);
                NavigationOutcome::Waiting(route)
            }
            GuardDecision::Redirect(path) => {
                let target = Route::parse(path);
                debug!("Redirect {} -> {}", route, target);
                self.enter(target.clone(), NavigationState::default());
                NavigationOutcome::Redirected { from: route, to: target }
            }
        }
    }

    fn enter(&mut self, route: Route, state: NavigationState) {
        self.history.push(route.clone());
        self.current = route;
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StorageKeys;
    use voyant_core::Booking;
    use voyant_store::MemoryTokenStorage;

    fn navigator(entries: &[(&str, &str)]) -> Navigator {
        let storage = Arc::new(MemoryTokenStorage::with_entries(entries.iter().copied()));
        Navigator::new(Arc::new(SessionStore::new(storage, StorageKeys::default())))
    }

    fn booking() -> Booking {
        serde_json::from_value(serde_json::json!({"id": 9, "total": "80.00"})).unwrap()
    }

    #[test]
    fn test_state_is_lost_on_reload() {
        let mut nav = navigator(&[("access_token", "a1")]);
        nav.session.finish_loading();

        let outcome = nav.navigate_with_state(Route::Payment, NavigationState::for_payment(booking()));
        assert_eq!(outcome, NavigationOutcome::Rendered(Route::Payment));
        assert!(nav.state().booking.is_some());

        nav.reload();
        assert_eq!(nav.current(), &Route::Payment);
        assert!(nav.state().is_empty());
    }

    #[test]
    fn test_direct_visit_has_no_state() {
        let mut nav = navigator(&[("access_token", "a1")]);
        nav.session.finish_loading();
        nav.navigate("/receipt");
        assert!(nav.state().is_empty());
    }

    #[test]
    fn test_anonymous_redirected_to_login() {
        let mut nav = navigator(&[]);
        let outcome = nav.navigate("/dashboard");
        assert_eq!(
            outcome,
            NavigationOutcome::Redirected {
                from: Route::Dashboard,
                to: Route::Login
            }
        );
        assert_eq!(nav.current(), &Route::Login);
    }

    #[test]
    fn test_waits_for_loading_then_resolves() {
        let mut nav = navigator(&[("access_token", "a1")]);
        let outcome = nav.navigate_with_state(Route::Payment, NavigationState::for_payment(booking()));
        assert_eq!(outcome, NavigationOutcome::Waiting(Route::Payment));

        nav.session.finish_loading();
        assert_eq!(nav.resolve(), NavigationOutcome::Rendered(Route::Payment));
        assert!(nav.state().booking.is_some());
    }

    #[test]
    fn test_back_returns_to_previous_route() {
        let mut nav = navigator(&[]);
        nav.navigate("/hotels");
        nav.navigate("/hotels/4");
        assert_eq!(nav.back(), Some(NavigationOutcome::Rendered(Route::Hotels)));
    }

    #[test]
    fn test_back_on_first_entry_keeps_history() {
        let mut nav = navigator(&[]);
        nav.navigate("/hotels");
        assert_eq!(nav.back(), None);
        assert_eq!(nav.history, vec![Route::Hotels]);
        assert_eq!(nav.current(), &Route::Hotels);

        nav.navigate("/hotels/4");
        assert_eq!(nav.back(), Some(NavigationOutcome::Rendered(Route::Hotels)));
        assert_eq!(nav.history, vec![Route::Hotels]);
    }
}
