//! # Settings Handlers
//!
//! Theme and language changes apply immediately and are written to the
//! preference store. A failed write is shown on the settings form; the
//! change itself stays in effect for this run.

use crate::app::{App, Form};
use crate::store::{LanguageCode, ThemeMode};

impl App {
    pub fn toggle_theme(&mut self) -> ThemeMode {
        let mode = self.state.write().theme.toggle();
        self.saved.theme = Some(mode);
        self.persist_preferences();
        mode
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.state.write().theme.set(mode);
        self.saved.theme = Some(mode);
        self.persist_preferences();
    }

    pub fn set_language(&mut self, code: LanguageCode) {
        self.state.write().language.set_language(code);
        self.saved.language = Some(code);
        self.persist_preferences();
    }

    fn persist_preferences(&mut self) {
        let result = self.preferences.save(&self.saved);
        let mut state = self.state.write();
        match result {
            Ok(()) => state.clear_error(Form::Settings),
            Err(e) => {
                tracing::warn!(error = %e, "Could not save preferences");
                state.set_error(Form::Settings, e.to_string());
            }
        }
    }
}
