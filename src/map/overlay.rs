use egui::{Color32, Vec2};
use thiserror::Error;

use super::geo::{Coordinate, GeoBounds, METERS_PER_DEGREE_LAT};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
}

/// Stable per-overlay identity. Keys label animation state across frames, so
/// it must not change while the overlay exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u32);

/// Zone geometry in world coordinates. Rendering dispatches on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    Circle {
        center: Coordinate,
        radius_m: f64,
    },
    /// Boundary ring. Non-empty by construction, see [`Overlay::polygon`].
    Polygon {
        vertices: Vec<Coordinate>,
    },
}

/// A styled airspace zone: geometry plus color, label text and the
/// designer-specified label offset in pixels at the reference zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub color: Color32,
    pub label: String,
    pub label_offset: Vec2,
    pub geometry: ZoneGeometry,
}

impl Overlay {
    pub fn circle(
        id: OverlayId,
        center: Coordinate,
        radius_m: f64,
        color: Color32,
        label: impl Into<String>,
        label_offset: Vec2,
    ) -> Self {
        Self {
            id,
            color,
            label: label.into(),
            label_offset,
            geometry: ZoneGeometry::Circle { center, radius_m },
        }
    }

    /// Fails with [`GeometryError::InvalidGeometry`] on an empty vertex list,
    /// which would otherwise produce a NaN centroid.
    pub fn polygon(
        id: OverlayId,
        vertices: Vec<Coordinate>,
        color: Color32,
        label: impl Into<String>,
        label_offset: Vec2,
    ) -> Result<Self, GeometryError> {
        if vertices.is_empty() {
            return Err(GeometryError::InvalidGeometry(
                "polygon needs at least one vertex",
            ));
        }
        Ok(Self {
            id,
            color,
            label: label.into(),
            label_offset,
            geometry: ZoneGeometry::Polygon { vertices },
        })
    }

    /// Reference point for the zone's label: circle center, or the
    /// mean-of-vertices centroid for polygons.
    pub fn anchor(&self) -> Coordinate {
        match &self.geometry {
            ZoneGeometry::Circle { center, .. } => *center,
            // Vertex list is non-empty by construction.
            ZoneGeometry::Polygon { vertices } => centroid(vertices).unwrap_or_default(),
        }
    }

    /// Bounding box in world coordinates, used for viewport culling.
    pub fn bounds(&self) -> GeoBounds {
        match &self.geometry {
            ZoneGeometry::Circle { center, radius_m } => {
                let dlat = radius_m / METERS_PER_DEGREE_LAT;
                // Longitude degrees shrink toward the poles.
                let cos_lat = center.latitude().to_radians().cos().max(0.01);
                let dlon = dlat / cos_lat;
                GeoBounds::new(
                    center.latitude() - dlat,
                    center.longitude() - dlon,
                    center.latitude() + dlat,
                    center.longitude() + dlon,
                )
            }
            ZoneGeometry::Polygon { vertices } => {
                let mut south = f64::MAX;
                let mut west = f64::MAX;
                let mut north = f64::MIN;
                let mut east = f64::MIN;
                for vertex in vertices {
                    south = south.min(vertex.latitude());
                    west = west.min(vertex.longitude());
                    north = north.max(vertex.latitude());
                    east = east.max(vertex.longitude());
                }
                GeoBounds::new(south, west, north, east)
            }
        }
    }
}

/// Arithmetic mean of vertex latitudes and longitudes. Not guaranteed to be
/// interior for concave rings; that matches the labeling behavior we want.
pub fn centroid(vertices: &[Coordinate]) -> Result<Coordinate, GeometryError> {
    if vertices.is_empty() {
        return Err(GeometryError::InvalidGeometry(
            "centroid of empty vertex list",
        ));
    }
    let count = vertices.len() as f64;
    let lat = vertices.iter().map(|c| c.latitude()).sum::<f64>() / count;
    let lon = vertices.iter().map(|c| c.longitude()).sum::<f64>() / count;
    Ok(Coordinate::new(lat, lon))
}

/// The current set of zones. Read-only after startup; contents come from the
/// compiled-in zone table.
#[derive(Debug, Default)]
pub struct OverlayStore {
    overlays: Vec<Overlay>,
}

impl OverlayStore {
    pub fn new(overlays: Vec<Overlay>) -> Self {
        Self { overlays }
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }
}
