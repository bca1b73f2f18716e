use egui::{
    Align2, Color32, FontId, Pos2, Rangef, Response, Sense, Shape, Stroke, Ui, Vec2, Widget,
};
use log::debug;
use serde::{Deserialize, Serialize};

use super::geo::{Coordinate, Projection, Viewport};
use super::labels::{place_labels, LabelTuning};
use super::overlay::{Overlay, ZoneGeometry};

/// Id source shared between the widget and the code that pushes viewport
/// commands into it (zoom buttons, follow-user recentering).
pub const MAP_ID_SOURCE: &str = "airzone_map";

const CIRCLE_STROKE_WIDTH: f32 = 1.0;
const POLYGON_STROKE_WIDTH: f32 = 0.5;
const FILL_OPACITY: f32 = 0.3;
const LABEL_FONT_SIZE: f32 = 14.0;

const BACKGROUND: Color32 = Color32::from_rgb(18, 22, 28);
const GRATICULE: Color32 = Color32::from_gray(52);

/// Canonical viewport plus in-flight gesture state, round-tripped through
/// egui's persisted data each frame. Gesture handling writes it inside the
/// widget; zoom buttons and follow-user recentering write it from the app.
/// Both go through load/store, so there is exactly one source of truth.
#[derive(Clone, Serialize, Deserialize)]
pub struct MapState {
    viewport: Viewport,
    dragging: bool,
    drag_start: Option<Pos2>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            dragging: false,
            drag_start: None,
        }
    }
}

impl MapState {
    pub fn load(ctx: &egui::Context, id: egui::Id) -> Self {
        ctx.data_mut(|d| d.get_persisted::<Self>(id).unwrap_or_default())
    }

    pub fn store(self, ctx: &egui::Context, id: egui::Id) {
        ctx.data_mut(|d| d.insert_persisted(id, self));
    }

    /// Initial state framing the first zone, the region shown on launch.
    pub fn framing_first(overlays: &[Overlay]) -> Self {
        let viewport = overlays
            .first()
            .map(|overlay| Viewport::framing(&overlay.bounds()))
            .unwrap_or_default();
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}

pub struct Map<'a> {
    id: egui::Id,
    overlays: &'a [Overlay],
    tuning: LabelTuning,
    location: Option<Coordinate>,
    viewport_size: Vec2,
}

impl<'a> Map<'a> {
    pub fn new(id_source: impl std::hash::Hash, overlays: &'a [Overlay]) -> Self {
        Self {
            id: egui::Id::new(id_source),
            overlays,
            tuning: LabelTuning::default(),
            location: None,
            viewport_size: Vec2::new(1024.0, 1024.0),
        }
    }

    pub fn viewport_size(mut self, size: Vec2) -> Self {
        self.viewport_size = size;
        self
    }

    pub fn tuning(mut self, tuning: LabelTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Device fix for the tracking indicator, when follow-user is on.
    pub fn location(mut self, location: Option<Coordinate>) -> Self {
        self.location = location;
        self
    }
}

impl Widget for Map<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let mut state = MapState::load(ui.ctx(), self.id);

        let (rect, response) = ui.allocate_exact_size(self.viewport_size, Sense::click_and_drag());

        ui.painter().rect(
            rect,
            0.0,
            BACKGROUND,
            Stroke::new(1.0, Color32::from_gray(70)),
        );

        let map_painter = ui.painter().with_clip_rect(rect);
        let degrees_per_pixel = Projection::new(state.viewport(), rect).degrees_per_pixel();

        // Drag to pan; inbound gesture updates overwrite the viewport.
        if response.dragged() {
            if !state.dragging {
                state.drag_start = response.hover_pos();
                state.dragging = true;
            }
            if let (Some(current_pos), Some(start_pos)) = (response.hover_pos(), state.drag_start) {
                let delta = current_pos - start_pos;
                state.viewport_mut().pan_degrees(
                    (delta.y * degrees_per_pixel.y) as f64,
                    (-delta.x * degrees_per_pixel.x) as f64,
                );
                state.drag_start = Some(current_pos);
            }
        } else if state.dragging {
            state.dragging = false;
            state.drag_start = None;
            debug!("pan ended at {:?}", state.viewport().center());
        }

        // Pinch / touch zoom.
        let mut zoomed = false;
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if (zoom_delta - 1.0).abs() > f32::EPSILON {
            state.viewport_mut().scale_spans(1.0 / zoom_delta as f64);
            zoomed = true;
        }

        // Scroll zoom, tanh-normalized so fast wheels do not jump levels.
        let mut scroll = ui.input(|i| i.smooth_scroll_delta).y;
        if scroll.abs() > f32::EPSILON && !zoomed && response.hovered() {
            scroll = (scroll / 10.0).tanh();
            state
                .viewport_mut()
                .scale_spans(2.0_f64.powf(-scroll as f64));
        }

        // Everything below redraws from scratch each frame; the overlay set
        // is small, so no incremental bookkeeping.
        let projection = Projection::new(state.viewport(), rect);
        draw_graticule(&map_painter, &projection, state.viewport());
        draw_overlays(&map_painter, &projection, self.overlays, state.viewport());
        draw_labels(
            ui,
            &map_painter,
            &projection,
            self.id,
            self.overlays,
            state.viewport(),
            &self.tuning,
        );

        if let Some(fix) = self.location {
            draw_location_indicator(&map_painter, projection.to_screen(fix));
        }

        state.store(ui.ctx(), self.id);

        response
    }
}

/// Lat/lon grid standing in for a basemap; the tile provider is out of scope.
fn draw_graticule(painter: &egui::Painter, projection: &Projection, viewport: &Viewport) {
    let bounds = viewport.bounds();
    let step = graticule_step(viewport.lat_span().max(viewport.lon_span()));
    let stroke = Stroke::new(0.5, GRATICULE);
    let rect = projection.rect();

    let mut lon = (bounds.west() / step).floor() * step;
    while lon <= bounds.east() {
        let x = projection.to_screen(Coordinate::new(bounds.south(), lon)).x;
        painter.vline(x, Rangef::new(rect.min.y, rect.max.y), stroke);
        lon += step;
    }

    let mut lat = (bounds.south() / step).floor() * step;
    while lat <= bounds.north() {
        let y = projection.to_screen(Coordinate::new(lat, bounds.west())).y;
        painter.hline(Rangef::new(rect.min.x, rect.max.x), y, stroke);
        lat += step;
    }
}

/// Grid spacing in degrees: roughly five lines across the viewport, snapped
/// up to a 1/2/5 decade value.
fn graticule_step(span: f64) -> f64 {
    let target = span / 5.0;
    let decade = 10.0_f64.powf(target.log10().floor());
    for multiple in [1.0, 2.0, 5.0] {
        if decade * multiple >= target {
            return decade * multiple;
        }
    }
    decade * 10.0
}

fn draw_overlays(
    painter: &egui::Painter,
    projection: &Projection,
    overlays: &[Overlay],
    viewport: &Viewport,
) {
    let view_bounds = viewport.bounds();
    for overlay in overlays {
        if !overlay.bounds().intersects(&view_bounds) {
            continue;
        }
        let fill = overlay.color.gamma_multiply(FILL_OPACITY);
        match &overlay.geometry {
            ZoneGeometry::Circle { center, radius_m } => {
                painter.circle(
                    projection.to_screen(*center),
                    projection.meters_to_pixels(*radius_m),
                    fill,
                    Stroke::new(CIRCLE_STROKE_WIDTH, overlay.color),
                );
            }
            ZoneGeometry::Polygon { vertices } => {
                let points = vertices
                    .iter()
                    .map(|vertex| projection.to_screen(*vertex))
                    .collect();
                painter.add(Shape::convex_polygon(
                    points,
                    fill,
                    Stroke::new(POLYGON_STROKE_WIDTH, overlay.color),
                ));
            }
        }
    }
}

fn draw_labels(
    ui: &Ui,
    painter: &egui::Painter,
    projection: &Projection,
    map_id: egui::Id,
    overlays: &[Overlay],
    viewport: &Viewport,
    tuning: &LabelTuning,
) {
    for placement in place_labels(overlays, viewport, tuning) {
        // Keyed by stable overlay id, so the fade survives re-renders and
        // retriggering mid-flight just retargets it.
        let target = if placement.visible { 1.0 } else { 0.0 };
        let alpha = ui.ctx().animate_value_with_time(
            map_id.with(placement.id),
            target,
            tuning.fade_seconds,
        );
        if alpha <= 0.0 {
            continue;
        }
        painter.text(
            projection.to_screen(placement.anchor) + placement.screen_offset,
            Align2::CENTER_CENTER,
            placement.text,
            FontId::proportional(LABEL_FONT_SIZE),
            placement.color.gamma_multiply(alpha),
        );
    }
}

fn draw_location_indicator(painter: &egui::Painter, position: Pos2) {
    painter.circle(
        position,
        6.0,
        Color32::from_rgb(64, 156, 255),
        Stroke::new(2.0, Color32::WHITE),
    );
    painter.circle_stroke(
        position,
        10.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(64, 156, 255, 100)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::overlay::OverlayId;
    use approx::assert_relative_eq;
    use egui::vec2;

    #[test]
    fn graticule_step_snaps_to_decades() {
        assert_relative_eq!(graticule_step(0.5), 0.1);
        assert_relative_eq!(graticule_step(1.0), 0.2);
        assert_relative_eq!(graticule_step(10.0), 2.0);
    }

    #[test]
    fn framing_first_centers_on_the_first_overlay() {
        let overlays = vec![Overlay::circle(
            OverlayId(1),
            Coordinate::new(43.6767, -79.63),
            5_556.0,
            Color32::RED,
            "zone",
            vec2(0.0, 0.0),
        )];
        let state = MapState::framing_first(&overlays);
        let center = state.viewport().center();
        assert!((center.latitude() - 43.6767).abs() < 1e-9);
        assert!((center.longitude() - -79.63).abs() < 1e-9);
        // Framing leaves the zone well inside the visible span.
        assert!(state.viewport().lat_span() > 2.0 * 5_556.0 / 111_320.0);
    }

    #[test]
    fn framing_first_of_empty_store_falls_back_to_default() {
        let state = MapState::framing_first(&[]);
        assert_eq!(state.viewport(), &Viewport::default());
    }
}
