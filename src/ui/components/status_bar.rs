//! Status line shown under the input bar

use crate::ui::state::{Activity, UiState};
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct StatusBar<'a> {
    state: &'a UiState,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let (text, color) = self.status_line();
            ui.label(RichText::new(text).size(12.0).color(color));
        });

        if self.state.is_busy() {
            ui.ctx().request_repaint();
        }
    }

    fn status_line(&self) -> (String, egui::Color32) {
        if let Some(error) = &self.state.last_error {
            return (error.clone(), self.theme.error);
        }

        match self.state.activity {
            Activity::Listening => ("Listening...".to_string(), self.theme.listening),
            Activity::Thinking => ("Thinking...".to_string(), self.theme.primary),
            Activity::Idle => match &self.state.last_export {
                Some(path) => (
                    format!("Transcript saved to {}", path.display()),
                    self.theme.text_muted,
                ),
                None => ("Ready".to_string(), self.theme.text_muted),
            },
        }
    }
}
