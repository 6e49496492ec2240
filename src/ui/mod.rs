//! Desktop user interface built with egui/eframe

mod app;
mod components;
mod state;
mod theme;

pub use app::ParleyApp;
pub use state::{Activity, UiState};
pub use theme::Theme;

use crate::session::SessionWorkerHandle;

/// Run the Parley application
pub fn run(handle: SessionWorkerHandle) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 640.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Parley"),
        ..Default::default()
    };

    eframe::run_native(
        "Parley",
        options,
        Box::new(|cc| Ok(Box::new(ParleyApp::new(cc, handle)))),
    )
}
