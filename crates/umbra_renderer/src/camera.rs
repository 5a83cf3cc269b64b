//! Camera for primary ray generation.
//!
//! The camera looks down its local +Z axis through an image plane at unit
//! distance. Screen coordinates span `[-1, 1]` vertically; horizontally the
//! span is stretched by the aspect ratio so pixels stay square.

use umbra_math::{ObjectTransform, Ray, Vec2, Vec3};

/// Maps pixels of a `width` x `height` buffer to world-space rays.
///
/// Row 0 is the top of the image: screen y decreases as the row index grows.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    transform: ObjectTransform,
    width: u32,
    height: u32,
    aspect: f32,
}

impl Camera {
    /// Create a camera for the given pose and resolution.
    pub fn new(transform: ObjectTransform, width: u32, height: u32) -> Self {
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        Self {
            transform,
            width,
            height,
            aspect,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// World-space ray origin.
    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    /// Screen coordinates of pixel (x, y).
    ///
    /// `uv = (x, y) / (width, height)` is mapped to `[-1, 1)`, with +y up.
    pub fn screen_coords(&self, x: u32, y: u32) -> Vec2 {
        let uv = Vec2::new(x as f32 / self.width as f32, y as f32 / self.height as f32);
        Vec2::new((uv.x - 0.5) * 2.0 * self.aspect, (0.5 - uv.y) * 2.0)
    }

    /// Primary ray through pixel (x, y).
    ///
    /// Returns `None` only if the camera pose cannot produce a direction.
    pub fn ray_for_pixel(&self, x: u32, y: u32) -> Option<Ray> {
        let suv = self.screen_coords(x, y);
        let local = Vec3::new(suv.x, suv.y, 1.0).normalize();
        Ray::new(self.position(), self.transform.direction_to_world(local))
    }

    /// Primary ray for a row-major flat pixel index.
    #[inline]
    pub fn ray_for_index(&self, index: usize) -> Option<Ray> {
        let width = self.width as usize;
        self.ray_for_pixel((index % width) as u32, (index / width) as u32)
    }
}
