//! # Navigation Handlers

use crate::app::{App, View};

impl App {
    /// Change view with the authentication guard. Returns the view actually
    /// shown: protected views redirect to login without a session.
    ///
    /// Leaving a page cancels the reads it started.
    pub fn navigate(&mut self, view: View) -> View {
        let (from, to) = {
            let mut state = self.state.write();
            let to = if view.requires_auth() && !state.is_authenticated() {
                tracing::info!(route = view.route(), "Access denied, redirecting to login");
                View::Login { expired: false }
            } else {
                view
            };
            let from = state.view;
            state.view = to;
            (from, to)
        };

        if !from.same_page(&to) {
            let cancelled = self.requests.cancel_owned_by(&from);
            if cancelled > 0 {
                tracing::debug!(from = from.route(), cancelled, "Cancelled requests of previous view");
                self.state.write().transactions.fetch_cancelled();
            }
        }

        tracing::debug!(from = from.route(), to = to.route(), "Navigated");
        to
    }
}
