pub mod detections;
pub mod profiles;
pub mod tracking;
pub mod triggers;
