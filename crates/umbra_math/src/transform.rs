// Transform utilities for Mat4
//
// Extends glam::Mat4 with the checks needed to turn an object pose into a
// pair of world/local matrices that are safe to evaluate distance fields with.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3() and inverse()

use glam::{Mat4, Vec3};

/// Determinants smaller than this are treated as singular.
const MIN_DETERMINANT: f32 = 1e-12;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Length of each basis axis, i.e. the scale applied along local X, Y and Z.
    fn axis_scales(&self) -> Vec3;

    /// True if every element is finite and the matrix has a usable inverse.
    fn is_invertible(&self) -> bool;
}

impl Mat4Ext for Mat4 {
    fn axis_scales(&self) -> Vec3 {
        Vec3::new(
            self.x_axis.truncate().length(),
            self.y_axis.truncate().length(),
            self.z_axis.truncate().length(),
        )
    }

    fn is_invertible(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        let det = self.determinant();
        det.is_finite() && det.abs() > MIN_DETERMINANT
    }
}

/// An object pose as the pair of matrices used during a render pass.
///
/// `distance_scale` is the smallest axis scale of `local_to_world`. Multiplying
/// a local-space distance by it keeps the result a conservative bound on the
/// world-space distance, even for non-uniformly scaled shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub local_to_world: Mat4,
    pub world_to_local: Mat4,
    pub distance_scale: f32,
}

impl ObjectTransform {
    /// Identity pose at the world origin.
    pub const IDENTITY: ObjectTransform = ObjectTransform {
        local_to_world: Mat4::IDENTITY,
        world_to_local: Mat4::IDENTITY,
        distance_scale: 1.0,
    };

    /// Build from an object's local-to-world matrix.
    ///
    /// Returns `None` for matrices that are not finite or not invertible.
    pub fn new(local_to_world: Mat4) -> Option<Self> {
        if !local_to_world.is_invertible() {
            return None;
        }
        let world_to_local = local_to_world.inverse();
        if !world_to_local.is_finite() {
            return None;
        }
        let distance_scale = local_to_world.axis_scales().min_element();

        Some(Self {
            local_to_world,
            world_to_local,
            distance_scale,
        })
    }

    /// World-space position of the object's origin.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.local_to_world.w_axis.truncate()
    }

    /// Transform a world-space point into the object's local space.
    #[inline]
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.world_to_local.transform_point3(point)
    }

    /// Rotate (and scale) a local direction into world space, ignoring translation.
    #[inline]
    pub fn direction_to_world(&self, direction: Vec3) -> Vec3 {
        self.local_to_world.transform_vector3(direction)
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::PI;

    #[test]
    fn test_axis_scales() {
        let mat = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        let scales = mat.axis_scales();

        assert!((scales - Vec3::new(2.0, 3.0, 4.0)).length() < 0.001);
    }

    #[test]
    fn test_axis_scales_ignore_rotation() {
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(PI / 3.0),
            Vec3::new(1.0, 2.0, 3.0),
        );

        assert!((mat.axis_scales() - Vec3::splat(2.0)).length() < 0.001);
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(!flat.is_invertible());
        assert!(ObjectTransform::new(flat).is_none());

        let mut broken = Mat4::IDENTITY;
        broken.w_axis.x = f32::NAN;
        assert!(ObjectTransform::new(broken).is_none());
    }

    #[test]
    fn test_to_local_translation() {
        let transform = ObjectTransform::new(Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0))).unwrap();

        let local = transform.to_local(Vec3::new(11.0, 22.0, 33.0));
        assert!((local - Vec3::new(1.0, 2.0, 3.0)).length() < 0.001);
        assert_eq!(transform.position(), Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_to_local_rotation_roundtrip() {
        let mat = Mat4::from_rotation_y(PI / 4.0); // 45 degrees
        let transform = ObjectTransform::new(mat).unwrap();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let world = transform.local_to_world.transform_point3(point);
        let back = transform.to_local(world);

        assert!((back - point).length() < 0.001);
    }

    #[test]
    fn test_direction_ignores_translation() {
        let mat = Mat4::from_rotation_translation(Quat::from_rotation_z(PI / 2.0), Vec3::splat(100.0));
        let transform = ObjectTransform::new(mat).unwrap();

        // X rotates to Y, translation has no effect on directions
        let dir = transform.direction_to_world(Vec3::X);
        assert!((dir - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_distance_scale_is_smallest_axis() {
        let transform = ObjectTransform::new(Mat4::from_scale(Vec3::new(3.0, 0.5, 2.0))).unwrap();
        assert!((transform.distance_scale - 0.5).abs() < 0.001);
    }
}
