//! Scene evaluation: one scalar distance for any world-space point.

use umbra_core::{ConfigResult, FrameTransforms, SdfNode};
use umbra_math::{ObjectTransform, Vec3};

use crate::sdf;

/// A signed distance field that can be sampled from many threads at once.
///
/// Implementations must return a conservative bound: the magnitude never
/// exceeds the true distance to the nearest surface.
pub trait DistanceField: Sync {
    /// Signed distance from `p` to the nearest surface.
    fn distance(&self, p: Vec3) -> f32;
}

impl<F> DistanceField for F
where
    F: Fn(Vec3) -> f32 + Sync,
{
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        self(p)
    }
}

/// A scene tree bound to one frame's shape transforms.
///
/// The transforms are owned copies taken when the field is built, so the
/// caller's poses can keep changing while a pass is running.
#[derive(Debug, Clone)]
pub struct SceneField<'a> {
    root: &'a SdfNode,
    shapes: Vec<ObjectTransform>,
}

impl<'a> SceneField<'a> {
    /// Bind `root` to the shape poses of `frame`.
    ///
    /// Fails if a pose is degenerate or the tree refers to a shape transform
    /// that `frame` does not provide.
    pub fn new(root: &'a SdfNode, frame: &FrameTransforms) -> ConfigResult<Self> {
        let shapes = frame
            .shapes
            .iter()
            .enumerate()
            .map(|(index, transform)| transform.to_object(|| format!("shape {}", index)))
            .collect::<ConfigResult<Vec<_>>>()?;

        root.validate(shapes.len())?;

        Ok(Self { root, shapes })
    }

    /// Number of bound shape transforms.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    fn eval(&self, node: &SdfNode, p: Vec3) -> f32 {
        match node {
            SdfNode::Primitive { shape, transform } => {
                // Index checked in new()
                let object = &self.shapes[*transform];
                sdf::shape_distance(shape, object.to_local(p)) * object.distance_scale
            }
            SdfNode::Combine { op, blend, a, b } => {
                let d1 = self.eval(a, p);
                let d2 = self.eval(b, p);
                sdf::combine(*op, d1, d2, *blend)
            }
        }
    }
}

impl DistanceField for SceneField<'_> {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        self.eval(self.root, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::{ConfigError, Shape, Transform};
    use umbra_math::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn frame(shapes: Vec<Transform>) -> FrameTransforms {
        FrameTransforms::new(Transform::default(), Transform::default(), shapes)
    }

    #[test]
    fn test_translated_sphere() {
        let root = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0);
        let frame = frame(vec![Transform::from_translation(Vec3::new(3.0, 0.0, 0.0))]);
        let field = SceneField::new(&root, &frame).unwrap();

        assert!(field.distance(Vec3::new(4.0, 0.0, 0.0)).abs() < 1e-5);
        assert!((field.distance(Vec3::ZERO) - 2.0).abs() < 1e-5);
        assert!(field.distance(Vec3::new(3.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_rotated_box() {
        let root = SdfNode::primitive(
            Shape::Box {
                half_extents: Vec3::new(2.0, 0.5, 0.5),
            },
            0,
        );
        // Long axis turned from X to Y
        let frame = frame(vec![Transform::from_translation_rotation(
            Vec3::ZERO,
            Quat::from_rotation_z(FRAC_PI_2),
        )]);
        let field = SceneField::new(&root, &frame).unwrap();

        assert!(field.distance(Vec3::new(0.0, 2.0, 0.0)).abs() < 1e-4);
        assert!(field.distance(Vec3::new(2.0, 0.0, 0.0)) > 1.0);
    }

    #[test]
    fn test_scaled_sphere_is_world_sized() {
        let root = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0);
        let frame = frame(vec![Transform::default().with_scale(2.0)]);
        let field = SceneField::new(&root, &frame).unwrap();

        assert!(field.distance(Vec3::new(2.0, 0.0, 0.0)).abs() < 1e-5);
        assert!((field.distance(Vec3::new(5.0, 0.0, 0.0)) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_composition_order() {
        let sphere = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0);
        let plane = SdfNode::primitive(Shape::plane(Vec3::Y), 1);
        let root = sphere.union(plane);
        let frame = frame(vec![
            Transform::default(),
            Transform::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        ]);
        let field = SceneField::new(&root, &frame).unwrap();

        // Above the sphere: sphere is closer than the plane
        assert!((field.distance(Vec3::new(0.0, 3.0, 0.0)) - 2.0).abs() < 1e-5);
        // Far to the side: plane is closer
        assert!((field.distance(Vec3::new(10.0, 0.0, 0.0)) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_subtraction_hollows() {
        let cube = SdfNode::primitive(Shape::Box { half_extents: Vec3::ONE }, 0);
        let hole = SdfNode::primitive(Shape::Sphere { radius: 0.5 }, 0);
        let root = cube.smooth_subtract(hole, 0.0);
        let field = SceneField::new(&root, &frame(vec![Transform::default()])).unwrap();

        // The center is now empty
        assert!(field.distance(Vec3::ZERO) > 0.0);
        // The shell is still solid
        assert!(field.distance(Vec3::new(0.8, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_intersection_keeps_lens() {
        let left = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0);
        let right = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 1);
        let frame = frame(vec![
            Transform::from_translation(Vec3::new(-0.5, 0.0, 0.0)),
            Transform::from_translation(Vec3::new(0.5, 0.0, 0.0)),
        ]);

        let hard_root = left.clone().smooth_intersect(right.clone(), 0.0);
        let smooth_root = left.smooth_intersect(right, 0.1);
        let hard = SceneField::new(&hard_root, &frame).unwrap();
        let smooth = SceneField::new(&smooth_root, &frame).unwrap();

        // Inside both spheres
        for p in [Vec3::ZERO, Vec3::new(0.0, 0.8, 0.0), Vec3::new(0.0, 0.0, -0.7)] {
            assert!(hard.distance(p) < 0.0, "{:?} should be inside the lens", p);
            assert!(smooth.distance(p) < 0.0, "{:?} should be inside the smooth lens", p);
        }

        // Inside only one sphere, or outside both
        for p in [Vec3::new(0.8, 0.0, 0.0), Vec3::new(-0.8, 0.0, 0.0), Vec3::new(0.0, 0.9, 0.0), Vec3::new(3.0, 0.0, 0.0)] {
            assert!(hard.distance(p) > 0.0, "{:?} should be outside the lens", p);
            assert!(smooth.distance(p) > 0.0, "{:?} should be outside the smooth lens", p);
        }

        // Hard intersection is the larger of the two distances
        assert!((hard.distance(Vec3::new(0.8, 0.0, 0.0)) - 0.3).abs() < 1e-5);
        // Smoothing only ever shrinks the solid
        assert!(smooth.distance(Vec3::ZERO) >= hard.distance(Vec3::ZERO));
    }

    #[test]
    fn test_missing_transform() {
        let root = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 2);
        let err = SceneField::new(&root, &frame(vec![Transform::default()])).unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingTransform {
                index: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_degenerate_transform() {
        let root = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0);
        let frame = frame(vec![Transform::default().with_scale(0.0)]);

        assert!(matches!(
            SceneField::new(&root, &frame),
            Err(ConfigError::DegenerateTransform(_))
        ));
    }

    #[test]
    fn test_closure_field() {
        let field = |p: Vec3| p.y;
        assert_eq!(field.distance(Vec3::new(0.0, 2.5, 0.0)), 2.5);
    }
}
