// Re-export glam for convenience
pub use glam::*;

// Umbra math types
mod interval;
mod ray;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Mat4Ext, ObjectTransform};
