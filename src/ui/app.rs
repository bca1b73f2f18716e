use eframe::egui;
use egui::{vec2, Color32, Margin, Sense, Stroke, Style};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::location::{FixedLocation, LocationService};
use crate::map::geo::Coordinate;
use crate::map::labels::LabelTuning;
use crate::map::map::{Map, MapState, MAP_ID_SOURCE};
use crate::map::overlay::OverlayStore;
use crate::zones;

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct AirzoneApp {
    follow_user: bool,
    #[serde(skip)]
    store: OverlayStore,
    #[serde(skip)]
    location: Box<dyn LocationService>,
    #[serde(skip)]
    tuning: LabelTuning,
}

impl Default for AirzoneApp {
    fn default() -> Self {
        Self {
            follow_user: false,
            store: OverlayStore::new(zones::builtin_zones().unwrap_or_default()),
            location: Box::new(FixedLocation::new(Coordinate::new(43.644, -79.395))),
            tuning: LabelTuning::default(),
        }
    }
}

impl eframe::App for AirzoneApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // F11 toggles fullscreen
        if let Some(new_fullscreen) = ctx.input(|i| {
            if i.key_pressed(egui::Key::F11) {
                Some(!i.viewport().fullscreen.unwrap_or(false))
            } else {
                None
            }
        }) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(new_fullscreen));
            ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(!new_fullscreen));
        }

        let map_id = egui::Id::new(MAP_ID_SOURCE);

        // Follow mode pushes the fix into the viewport as an outbound
        // command; only written when the center actually moves, so gesture
        // pans are not fought over by a per-frame rewrite.
        let fix = self.location.current_fix();
        if self.follow_user {
            if let Some(fix) = fix {
                let mut state = MapState::load(ctx, map_id);
                if state.viewport().center() != fix {
                    state.viewport_mut().set_center(fix);
                    debug!("recentered on location fix {:?}", fix);
                    state.store(ctx, map_id);
                }
            }
        }

        egui::SidePanel::right("controls")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Airzone");
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Zoom in").clicked() {
                        let mut state = MapState::load(ctx, map_id);
                        state.viewport_mut().zoom_in();
                        state.store(ctx, map_id);
                    }
                    if ui.button("Zoom out").clicked() {
                        let mut state = MapState::load(ctx, map_id);
                        state.viewport_mut().zoom_out();
                        state.store(ctx, map_id);
                    }
                });
                ui.checkbox(&mut self.follow_user, "Follow position");
                ui.separator();

                ui.label("Zones");
                for overlay in self.store.overlays() {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, overlay.color);
                        ui.label(&overlay.label);
                    });
                }
            });

        let frame = egui::Frame {
            fill: egui::Color32::TRANSPARENT,
            stroke: egui::Stroke::new(1.0, egui::Color32::from_gray(70)),
            inner_margin: Margin::same(1.0),
            outer_margin: Margin::same(0.0),
            ..Default::default()
        };

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            // Hide debug info
            ui.style_mut().debug.debug_on_hover = false;

            let map = Map::new(MAP_ID_SOURCE, self.store.overlays())
                .viewport_size(ui.available_size())
                .tuning(self.tuning)
                .location(self.follow_user.then_some(fix).flatten());
            ui.add(map);
        });
    }
}

impl AirzoneApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: OverlayStore,
        location: Box<dyn LocationService>,
    ) -> Self {
        cc.egui_ctx.set_style(Self::get_dark_theme_style(&cc.egui_ctx));
        Self {
            follow_user: false,
            store,
            location,
            tuning: LabelTuning::default(),
        }
    }

    pub fn get_dark_theme_style(ctx: &egui::Context) -> Style {
        use egui::{FontFamily, FontId, TextStyle};

        let mut style = (*ctx.style()).clone();

        // Set text styles
        style.text_styles = [
            (TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(15.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
            (TextStyle::Button, FontId::new(15.0, FontFamily::Proportional)),
            (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        ]
        .into();

        let primary_bg_color = Color32::from_rgb(32, 33, 36);

        style.visuals = egui::Visuals::dark();
        style.visuals.override_text_color = Some(Color32::LIGHT_GRAY);
        style.visuals.panel_fill = primary_bg_color;
        style.visuals.window_fill = primary_bg_color;
        style.visuals.window_stroke = Stroke::new(1.0, Color32::from_gray(60));
        style.spacing.window_margin = Margin::same(4.0);
        style.spacing.button_padding = vec2(6.0, 3.0);

        style
    }
}
