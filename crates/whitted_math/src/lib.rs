// Re-export glam for convenience
pub use glam::*;

// Whitted math types
mod camera;
mod interval;
mod ray;
mod transform;

pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{safe_normalize, Mat4Ext};
