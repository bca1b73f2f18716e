use egui::{Color32, Vec2};

use super::geo::{Coordinate, Viewport};
use super::overlay::{Overlay, OverlayId};

/// Label behavior knobs. Defaults are the shipped tuning: offsets apply
/// as-designed at a 0.5 degree span, labels disappear past 0.5 degrees, and
/// threshold crossings fade over a quarter second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelTuning {
    /// Latitude span at which designer offsets apply unscaled.
    pub reference_span: f64,
    /// Labels are opaque at spans up to and including this, hidden beyond.
    pub visibility_span: f64,
    /// Duration of the opacity transition when crossing the threshold.
    pub fade_seconds: f32,
}

impl Default for LabelTuning {
    fn default() -> Self {
        Self {
            reference_span: 0.5,
            visibility_span: 0.5,
            fade_seconds: 0.25,
        }
    }
}

/// Channel-wise inversion of the zone color, alpha unchanged. Readable
/// against the zone's translucent fill for both light and dark colors, and
/// its own inverse.
pub fn contrasting_text_color(color: Color32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(255 - r, 255 - g, 255 - b, a)
}

/// Grows designer offsets as the user zooms in past the reference span so
/// labels stay visually proportionate; clamped to 1.0 when zoomed out.
pub fn offset_scale(lat_span: f64, tuning: &LabelTuning) -> f32 {
    (tuning.reference_span / lat_span).max(1.0) as f32
}

/// Binary visibility cutoff, inclusive at the threshold.
pub fn labels_visible(lat_span: f64, tuning: &LabelTuning) -> bool {
    lat_span <= tuning.visibility_span
}

/// One label per overlay per frame. Plain values recomputed every render
/// pass; nothing here carries state between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement<'a> {
    pub id: OverlayId,
    pub anchor: Coordinate,
    pub text: &'a str,
    pub color: Color32,
    pub screen_offset: Vec2,
    pub visible: bool,
}

pub fn place_labels<'a>(
    overlays: &'a [Overlay],
    viewport: &Viewport,
    tuning: &LabelTuning,
) -> Vec<LabelPlacement<'a>> {
    let scale = offset_scale(viewport.lat_span(), tuning);
    let visible = labels_visible(viewport.lat_span(), tuning);
    overlays
        .iter()
        .map(|overlay| LabelPlacement {
            id: overlay.id,
            anchor: overlay.anchor(),
            text: &overlay.label,
            color: contrasting_text_color(overlay.color),
            screen_offset: overlay.label_offset * scale,
            visible,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use egui::vec2;

    #[test]
    fn text_color_is_channel_inversion_with_alpha_kept() {
        let color = Color32::from_rgba_unmultiplied(200, 30, 90, 255);
        let inverted = contrasting_text_color(color);
        assert_eq!(inverted.to_srgba_unmultiplied(), [55, 225, 165, 255]);
    }

    #[test]
    fn inverting_twice_restores_the_color() {
        for color in [
            Color32::from_rgb(0, 0, 0),
            Color32::from_rgb(255, 255, 255),
            Color32::from_rgb(12, 200, 77),
        ] {
            assert_eq!(contrasting_text_color(contrasting_text_color(color)), color);
        }
    }

    #[test]
    fn offset_scale_matches_reference_table() {
        let tuning = LabelTuning::default();
        assert_relative_eq!(offset_scale(0.5, &tuning), 1.0);
        assert_relative_eq!(offset_scale(0.25, &tuning), 2.0);
        assert_relative_eq!(offset_scale(1.0, &tuning), 1.0);
    }

    #[test]
    fn visibility_boundary_is_inclusive() {
        let tuning = LabelTuning::default();
        assert!(labels_visible(0.2, &tuning));
        assert!(labels_visible(0.5, &tuning));
        assert!(!labels_visible(0.500001, &tuning));
        assert!(!labels_visible(1.0, &tuning));
    }

    #[test]
    fn circle_label_scenario_across_zoom_levels() {
        let overlay = Overlay::circle(
            OverlayId(1),
            Coordinate::new(43.6767, -79.63),
            5_556.0,
            Color32::RED,
            "control zone",
            vec2(0.0, 0.0),
        );
        let overlays = [overlay];
        let tuning = LabelTuning::default();

        let zoomed_in = Viewport::new(Coordinate::new(43.6767, -79.63), 0.2, 0.2);
        let placements = place_labels(&overlays, &zoomed_in, &tuning);
        assert!(placements[0].visible);
        assert_eq!(placements[0].screen_offset, vec2(0.0, 0.0));

        let zoomed_out = Viewport::new(Coordinate::new(43.6767, -79.63), 1.0, 1.0);
        let placements = place_labels(&overlays, &zoomed_out, &tuning);
        assert!(!placements[0].visible);
    }

    #[test]
    fn designer_offsets_scale_past_the_reference_span() {
        let overlay = Overlay::circle(
            OverlayId(4),
            Coordinate::new(43.0, -79.0),
            1_000.0,
            Color32::GREEN,
            "offset zone",
            vec2(6.0, -10.0),
        );
        let overlays = [overlay];
        let tuning = LabelTuning::default();

        let viewport = Viewport::new(Coordinate::new(43.0, -79.0), 0.25, 0.25);
        let placements = place_labels(&overlays, &viewport, &tuning);
        assert_eq!(placements[0].screen_offset, vec2(12.0, -20.0));
    }
}
