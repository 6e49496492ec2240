//! Scrolling transcript view
//!
//! Renders the conversation as role-aligned bubbles, newest at the bottom.

use crate::session::Role;
use crate::ui::state::{Activity, UiState};
use crate::ui::theme::Theme;
use egui::{self, Align, Layout, RichText};

pub struct MessageList<'a> {
    state: &'a UiState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if self.state.turns.is_empty() && !self.state.is_busy() {
                    self.show_empty_state(ui);
                    return;
                }

                for turn in &self.state.turns {
                    self.show_turn(ui, turn.role, &turn.content);
                    ui.add_space(self.theme.spacing_sm);
                }

                if self.state.activity == Activity::Thinking {
                    self.show_thinking_indicator(ui);
                }
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(
                RichText::new("Speak or type to start the conversation")
                    .size(16.0)
                    .color(self.theme.text_muted)
                    .italics(),
            );
        });
    }

    fn show_turn(&self, ui: &mut egui::Ui, role: Role, content: &str) {
        let (layout, fill, label) = match role {
            Role::User => (
                Layout::top_down(Align::Max),
                self.theme.user_bubble,
                "You",
            ),
            Role::Assistant => (
                Layout::top_down(Align::Min),
                self.theme.assistant_bubble,
                "Assistant",
            ),
        };

        ui.with_layout(layout, |ui| {
            ui.set_max_width(ui.available_width() * 0.8);
            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_sm)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(label)
                            .size(11.0)
                            .color(self.theme.text_muted),
                    );
                    ui.label(
                        RichText::new(content)
                            .size(15.0)
                            .color(self.theme.text_primary),
                    );
                });
        });
    }

    /// Animated dots while waiting for the provider
    fn show_thinking_indicator(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let time = ui.ctx().input(|i| i.time);
            for i in 0..3 {
                let phase = time * 3.0 + i as f64 * 0.5;
                let alpha = (phase.sin() * 0.5 + 0.5) as f32;
                ui.label(
                    RichText::new("●")
                        .size(12.0)
                        .color(self.theme.primary.gamma_multiply(alpha)),
                );
            }
        });
        ui.ctx().request_repaint();
    }
}
