use crate::map::geo::Coordinate;

/// Boundary to the device location source. The core only uses the fix to
/// recenter the viewport and place the tracking indicator in follow mode.
pub trait LocationService {
    /// Latest known position, if any.
    fn current_fix(&self) -> Option<Coordinate>;
}

/// Stand-in provider reporting a fixed position, enough to exercise the
/// follow-user mode without platform location plumbing.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    position: Coordinate,
}

impl FixedLocation {
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

impl LocationService for FixedLocation {
    fn current_fix(&self) -> Option<Coordinate> {
        Some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_location_always_reports_its_position() {
        let service = FixedLocation::new(Coordinate::new(43.6767, -79.63));
        let fix = service.current_fix().unwrap();
        assert_eq!(fix.latitude(), 43.6767);
        assert_eq!(fix.longitude(), -79.63);
    }
}
