//! Compiled-in airspace zone table. Static data, defined once at startup.

use egui::{vec2, Color32};

use crate::map::geo::Coordinate;
use crate::map::overlay::{GeometryError, Overlay, OverlayId};

/// The shipped zone set, Toronto-area demo data. Polygon construction is
/// fallible so a bad vertex list is caught at startup.
pub fn builtin_zones() -> Result<Vec<Overlay>, GeometryError> {
    Ok(vec![
        Overlay::circle(
            OverlayId(1),
            Coordinate::new(43.676_666_6, -79.63),
            5_556.0, // 3 NM
            Color32::from_rgb(0, 200, 220),
            "Pearson Control Zone",
            vec2(0.0, 0.0),
        ),
        Overlay::circle(
            OverlayId(2),
            Coordinate::new(43.627_5, -79.396_2),
            5_556.0,
            Color32::from_rgb(230, 80, 60),
            "City Centre Control Zone",
            vec2(0.0, -18.0),
        ),
        Overlay::polygon(
            OverlayId(3),
            vec![
                Coordinate::new(43.65, -79.38),
                Coordinate::new(43.66, -79.38),
                Coordinate::new(43.66, -79.36),
                Coordinate::new(43.65, -79.36),
            ],
            Color32::from_rgb(40, 80, 230),
            "Downtown Restricted",
            vec2(0.0, 16.0),
        )?,
        Overlay::polygon(
            OverlayId(4),
            vec![
                Coordinate::new(43.84, -79.14),
                Coordinate::new(43.92, -79.12),
                Coordinate::new(43.94, -79.00),
                Coordinate::new(43.86, -78.96),
                Coordinate::new(43.81, -79.04),
            ],
            Color32::from_rgb(240, 170, 40),
            "Claremont Training Area",
            vec2(12.0, 0.0),
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_zone_table_is_valid() {
        let zones = builtin_zones().unwrap();
        assert_eq!(zones.len(), 4);
    }

    #[test]
    fn builtin_zone_ids_are_unique() {
        let zones = builtin_zones().unwrap();
        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                assert_ne!(a.id, b.id, "{} and {} share an id", a.label, b.label);
            }
        }
    }
}
