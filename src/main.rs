#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod location;
mod map;
mod ui;
mod zones;

use log::info;

use crate::map::geo::Coordinate;
use crate::map::map::{MapState, MAP_ID_SOURCE};
use crate::map::overlay::OverlayStore;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(egui::vec2(1280.0, 900.0))
            .with_min_inner_size(egui::vec2(400.0, 300.0))
            .with_title("Airzone")
            .with_resizable(true)
            .with_decorations(true),
        ..Default::default()
    };

    let overlays = zones::builtin_zones().expect("built-in zone table must be valid");
    info!("loaded {} built-in zones", overlays.len());

    let store = OverlayStore::new(overlays);
    let fix = location::FixedLocation::new(Coordinate::new(43.644, -79.395));

    eframe::run_native(
        "Airzone",
        native_options,
        Box::new(move |cc| {
            // Start framed on the first zone rather than wherever the last
            // session left off.
            MapState::framing_first(store.overlays())
                .store(&cc.egui_ctx, egui::Id::new(MAP_ID_SOURCE));
            Ok(Box::new(ui::app::AirzoneApp::new(cc, store, Box::new(fix))))
        }),
    )
}
