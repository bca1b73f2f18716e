use std::ops::Add;

use egui::{pos2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude, the usual spherical-earth constant.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Span clamp range: MIN_SPAN stops the viewport from degenerating under
/// repeated zoom-in, MAX_SPAN keeps the whole latitude range on screen.
pub const MIN_SPAN: f64 = 0.001;
pub const MAX_SPAN: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Default for Coordinate {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl Add<Coordinate> for Coordinate {
    type Output = Coordinate;

    fn add(self, other: Coordinate) -> Coordinate {
        Coordinate {
            latitude: self.latitude + other.latitude,
            longitude: self.longitude + other.longitude,
        }
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    south: f64, // minimum latitude
    west: f64,  // minimum longitude
    north: f64, // maximum latitude
    east: f64,  // maximum longitude
}

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn size(&self) -> (f64, f64) {
        (self.north - self.south, self.east - self.west)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.south + self.north) / 2.0,
            longitude: (self.west + self.east) / 2.0,
        }
    }

    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.south <= other.north
            && self.north >= other.south
            && self.west <= other.east
            && self.east >= other.west
    }
}

/// The visible map region: center coordinate plus angular spans. The span is
/// the zoom level — small spans are zoomed in, large spans zoomed out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: Coordinate,
    lat_span: f64,
    lon_span: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Coordinate::default(),
            lat_span: 0.5,
            lon_span: 0.5,
        }
    }
}

impl Viewport {
    pub fn new(center: Coordinate, lat_span: f64, lon_span: f64) -> Self {
        Self {
            center,
            lat_span: lat_span.clamp(MIN_SPAN, MAX_SPAN),
            lon_span: lon_span.clamp(MIN_SPAN, MAX_SPAN),
        }
    }

    /// A viewport framing the given bounds with room around them, used for
    /// the initial region around the first zone.
    pub fn framing(bounds: &GeoBounds) -> Self {
        let (lat_size, lon_size) = bounds.size();
        Self::new(bounds.center(), lat_size * 2.0, lon_size * 2.0)
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn set_center(&mut self, center: Coordinate) {
        self.center = center;
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_span
    }

    pub fn lon_span(&self) -> f64 {
        self.lon_span
    }

    pub fn bounds(&self) -> GeoBounds {
        GeoBounds {
            south: self.center.latitude - self.lat_span / 2.0,
            west: self.center.longitude - self.lon_span / 2.0,
            north: self.center.latitude + self.lat_span / 2.0,
            east: self.center.longitude + self.lon_span / 2.0,
        }
    }

    /// Discrete zoom step: halve both spans.
    pub fn zoom_in(&mut self) {
        self.scale_spans(0.5);
    }

    /// Discrete zoom step: double both spans.
    pub fn zoom_out(&mut self) {
        self.scale_spans(2.0);
    }

    /// Continuous zoom from gestures; factor > 1 zooms out.
    pub fn scale_spans(&mut self, factor: f64) {
        self.lat_span = (self.lat_span * factor).clamp(MIN_SPAN, MAX_SPAN);
        self.lon_span = (self.lon_span * factor).clamp(MIN_SPAN, MAX_SPAN);
    }

    pub fn pan_degrees(&mut self, dlat: f64, dlon: f64) {
        self.center = self.center + Coordinate::new(dlat, dlon);
    }
}

/// World-to-screen mapping for a single frame: the viewport's bounds
/// stretched over the widget rect (plate carrée within the visible region).
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    rect: Rect,
    bounds: GeoBounds,
}

impl Projection {
    pub fn new(viewport: &Viewport, rect: Rect) -> Self {
        Self {
            rect,
            bounds: viewport.bounds(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn to_screen(&self, coordinate: Coordinate) -> Pos2 {
        let (lat_size, lon_size) = self.bounds.size();
        let x = (coordinate.longitude() - self.bounds.west()) / lon_size;
        let y = (self.bounds.north() - coordinate.latitude()) / lat_size;
        pos2(
            self.rect.min.x + x as f32 * self.rect.width(),
            self.rect.min.y + y as f32 * self.rect.height(),
        )
    }

    /// Degrees of latitude/longitude covered by one screen pixel.
    pub fn degrees_per_pixel(&self) -> Vec2 {
        let (lat_size, lon_size) = self.bounds.size();
        Vec2::new(
            (lon_size / self.rect.width() as f64) as f32,
            (lat_size / self.rect.height() as f64) as f32,
        )
    }

    /// Screen pixels for a ground distance, via the latitude-degree scale.
    pub fn meters_to_pixels(&self, meters: f64) -> f32 {
        let degrees = meters / METERS_PER_DEGREE_LAT;
        let (lat_size, _) = self.bounds.size();
        (degrees / lat_size * self.rect.height() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zoom_in_halves_both_spans() {
        let mut viewport = Viewport::new(Coordinate::new(43.0, -79.0), 0.5, 0.8);
        viewport.zoom_in();
        assert_relative_eq!(viewport.lat_span(), 0.25);
        assert_relative_eq!(viewport.lon_span(), 0.4);
    }

    #[test]
    fn zoom_out_doubles_both_spans() {
        let mut viewport = Viewport::new(Coordinate::new(43.0, -79.0), 0.5, 0.8);
        viewport.zoom_out();
        assert_relative_eq!(viewport.lat_span(), 1.0);
        assert_relative_eq!(viewport.lon_span(), 1.6);
    }

    #[test]
    fn zoom_in_then_out_restores_span() {
        let mut viewport = Viewport::new(Coordinate::new(43.0, -79.0), 0.3, 0.3);
        viewport.zoom_in();
        viewport.zoom_out();
        assert_relative_eq!(viewport.lat_span(), 0.3);
        assert_relative_eq!(viewport.lon_span(), 0.3);
    }

    #[test]
    fn spans_stay_clamped() {
        let mut viewport = Viewport::new(Coordinate::default(), MIN_SPAN, MAX_SPAN);
        viewport.zoom_in();
        assert_relative_eq!(viewport.lat_span(), MIN_SPAN);
        viewport.zoom_out();
        viewport.zoom_out();
        assert_relative_eq!(viewport.lon_span(), MAX_SPAN);
    }

    #[test]
    fn projection_maps_viewport_center_to_rect_center() {
        let viewport = Viewport::new(Coordinate::new(43.5, -79.5), 0.5, 0.5);
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0));
        let projection = Projection::new(&viewport, rect);
        let center = projection.to_screen(viewport.center());
        assert_relative_eq!(center.x, 400.0, epsilon = 0.01);
        assert_relative_eq!(center.y, 300.0, epsilon = 0.01);
    }

    #[test]
    fn projection_orients_north_up_east_right() {
        let viewport = Viewport::new(Coordinate::new(0.0, 0.0), 1.0, 1.0);
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        let projection = Projection::new(&viewport, rect);
        let north = projection.to_screen(Coordinate::new(0.4, 0.0));
        let east = projection.to_screen(Coordinate::new(0.0, 0.4));
        assert!(north.y < 50.0);
        assert!(east.x > 50.0);
    }

    #[test]
    fn meters_to_pixels_scales_with_rect_height() {
        let viewport = Viewport::new(Coordinate::new(43.5, -79.5), 0.1, 0.1);
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1000.0, 1000.0));
        let projection = Projection::new(&viewport, rect);
        // 0.05 degrees of latitude over a 0.1 degree viewport is half the rect.
        let pixels = projection.meters_to_pixels(0.05 * METERS_PER_DEGREE_LAT);
        assert_relative_eq!(pixels, 500.0, epsilon = 0.01);
    }
}
