//! Main application struct and eframe integration

use crate::session::SessionWorkerHandle;
use crate::ui::components::{InputBar, MessageList, StatusBar};
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, TopBottomPanel};
use tracing::info;

pub struct ParleyApp {
    state: UiState,
    theme: Theme,
}

impl ParleyApp {
    pub fn new(cc: &eframe::CreationContext<'_>, handle: SessionWorkerHandle) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        info!("Parley UI initialized");

        Self {
            state: UiState::new(handle),
            theme,
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Parley")
                    .size(22.0)
                    .strong()
                    .color(self.theme.text_primary),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let can_export = !self.state.turns.is_empty();
                let button = egui::Button::new("Save transcript")
                    .rounding(self.theme.button_rounding);

                if ui.add_enabled(can_export, button).clicked() {
                    self.state.request_export();
                }
            });
        });
    }
}

impl eframe::App for ParleyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();

        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_sm);
            self.show_header(ui);
            ui.add_space(self.theme.spacing_sm);
        });

        TopBottomPanel::bottom("input").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_sm);
            InputBar::new(&mut self.state, &self.theme).show(ui);
            StatusBar::new(&self.state, &self.theme).show(ui);
            ui.add_space(self.theme.spacing_sm);
        });

        CentralPanel::default().show(ctx, |ui| {
            MessageList::new(&self.state, &self.theme).show(ui);
        });

        // Events arrive from another thread; keep polling while work is
        // in flight even when the user is not interacting.
        if self.state.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
