pub mod geo;
pub mod labels;
pub mod map;
pub mod overlay;
