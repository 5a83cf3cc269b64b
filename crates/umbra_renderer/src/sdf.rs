//! Closed-form signed distance functions and boolean combinators.
//!
//! Primitives are evaluated in their own local space and are exact: the
//! returned value is the true signed distance, negative inside. Combinators
//! take two distances and keep the result a conservative bound.
//!
//! Formulas follow Inigo Quilez's distance function reference:
//! <https://iquilezles.org/articles/distfunctions/>

use umbra_core::{BlendOp, Shape};
use umbra_math::{Vec2, Vec3, Vec3Swizzles};

/// Sphere of `radius` centered on the origin.
#[inline]
pub fn sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

/// Axis-aligned box with the given half extents.
#[inline]
pub fn box3(p: Vec3, half_extents: Vec3) -> f32 {
    let q = p.abs() - half_extents;
    // Outside: distance to the nearest face/edge/corner. Inside: the largest
    // (least negative) face distance.
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Box whose edges are rounded by `radius`.
#[inline]
pub fn round_box(p: Vec3, half_extents: Vec3, radius: f32) -> f32 {
    box3(p, half_extents) - radius
}

/// Infinite plane through the origin. `normal` must be unit length.
#[inline]
pub fn plane(p: Vec3, normal: Vec3) -> f32 {
    p.dot(normal)
}

/// Torus in the XZ plane.
#[inline]
pub fn torus(p: Vec3, major_radius: f32, minor_radius: f32) -> f32 {
    let q = Vec2::new(p.xz().length() - major_radius, p.y);
    q.length() - minor_radius
}

/// Distance from `p` to `shape`.
#[inline]
pub fn shape_distance(shape: &Shape, p: Vec3) -> f32 {
    match *shape {
        Shape::Sphere { radius } => sphere(p, radius),
        Shape::Box { half_extents } => box3(p, half_extents),
        Shape::RoundBox {
            half_extents,
            radius,
        } => round_box(p, half_extents, radius),
        Shape::Plane { normal } => plane(p, normal),
        Shape::Torus {
            major_radius,
            minor_radius,
        } => torus(p, major_radius, minor_radius),
    }
}

/// Union of two distances.
#[inline]
pub fn union(d1: f32, d2: f32) -> f32 {
    d1.min(d2)
}

/// Remove the solid of `d1` from the solid of `d2`.
#[inline]
pub fn subtraction(d1: f32, d2: f32) -> f32 {
    (-d1).max(d2)
}

/// Overlap of two distances.
#[inline]
pub fn intersection(d1: f32, d2: f32) -> f32 {
    d1.max(d2)
}

#[inline]
fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Linear blend that returns `a` and `b` exactly at `t = 0` and `t = 1`.
#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
fn is_smooth(k: f32) -> bool {
    k.is_finite() && k > 0.0
}

/// Union with a rounded seam of width `k`.
///
/// Falls back to [`union`] for `k <= 0`.
#[inline]
pub fn smooth_union(d1: f32, d2: f32, k: f32) -> f32 {
    if !is_smooth(k) {
        return union(d1, d2);
    }
    let h = saturate(0.5 + 0.5 * (d2 - d1) / k);
    mix(d2, d1, h) - k * h * (1.0 - h)
}

/// Carve `d1` out of `d2` with a rounded seam of width `k`.
///
/// Falls back to [`subtraction`] for `k <= 0`.
#[inline]
pub fn smooth_subtraction(d1: f32, d2: f32, k: f32) -> f32 {
    if !is_smooth(k) {
        return subtraction(d1, d2);
    }
    let h = saturate(0.5 - 0.5 * (d2 + d1) / k);
    mix(d2, -d1, h) + k * h * (1.0 - h)
}

/// Intersection with a rounded seam of width `k`.
///
/// Falls back to [`intersection`] for `k <= 0`.
#[inline]
pub fn smooth_intersection(d1: f32, d2: f32, k: f32) -> f32 {
    if !is_smooth(k) {
        return intersection(d1, d2);
    }
    let h = saturate(0.5 - 0.5 * (d2 - d1) / k);
    mix(d2, d1, h) + k * h * (1.0 - h)
}

/// Apply `op` to two distances with blend radius `k`.
#[inline]
pub fn combine(op: BlendOp, d1: f32, d2: f32, k: f32) -> f32 {
    match op {
        BlendOp::Union => smooth_union(d1, d2, k),
        BlendOp::Subtraction => smooth_subtraction(d1, d2, k),
        BlendOp::Intersection => smooth_intersection(d1, d2, k),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f32 = 1e-5;

    #[test]
    fn test_sphere() {
        assert!(sphere(Vec3::new(2.0, 0.0, 0.0), 2.0).abs() < EPS);
        assert!(sphere(Vec3::ZERO, 2.0) < 0.0);
        assert!((sphere(Vec3::new(0.0, 5.0, 0.0), 2.0) - 3.0).abs() < EPS);
    }

    #[test]
    fn test_box() {
        let half = Vec3::new(1.0, 2.0, 3.0);

        // Face centers lie on the surface
        assert!(box3(Vec3::new(1.0, 0.0, 0.0), half).abs() < EPS);
        assert!(box3(Vec3::new(0.0, -2.0, 0.0), half).abs() < EPS);

        // Inside: distance to the nearest face
        assert!((box3(Vec3::ZERO, half) + 1.0).abs() < EPS);

        // Outside past a corner: euclidean distance to the corner
        let corner = box3(Vec3::new(2.0, 3.0, 3.0), half);
        assert!((corner - 2.0f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_round_box() {
        let half = Vec3::splat(1.0);
        assert!(round_box(Vec3::new(1.25, 0.0, 0.0), half, 0.25).abs() < EPS);
        assert!(round_box(Vec3::ZERO, half, 0.25) < 0.0);
        assert!(round_box(Vec3::new(4.0, 0.0, 0.0), half, 0.25) > 0.0);
    }

    #[test]
    fn test_plane() {
        assert!(plane(Vec3::new(3.0, 0.0, -7.0), Vec3::Y).abs() < EPS);
        assert!((plane(Vec3::new(0.0, 2.0, 0.0), Vec3::Y) - 2.0).abs() < EPS);
        assert!(plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y) < 0.0);
    }

    #[test]
    fn test_torus() {
        // Outer and inner rim of the tube
        assert!(torus(Vec3::new(1.25, 0.0, 0.0), 1.0, 0.25).abs() < EPS);
        assert!(torus(Vec3::new(0.0, 0.0, 0.75), 1.0, 0.25).abs() < EPS);
        // Inside the tube
        assert!(torus(Vec3::new(1.0, 0.0, 0.0), 1.0, 0.25) < 0.0);
        // Center of the ring is outside
        assert!((torus(Vec3::ZERO, 1.0, 0.25) - 0.75).abs() < EPS);
    }

    #[test]
    fn test_shape_distance_dispatch() {
        let shape = Shape::Torus {
            major_radius: 2.0,
            minor_radius: 0.5,
        };
        let p = Vec3::new(0.3, 0.7, -1.1);
        assert_eq!(shape_distance(&shape, p), torus(p, 2.0, 0.5));
    }

    #[test]
    fn test_hard_combinators() {
        assert_eq!(union(1.0, 2.0), 1.0);
        assert_eq!(intersection(1.0, 2.0), 2.0);
        // Inside d1 (-1) removes the solid of d2 (-2)
        assert_eq!(subtraction(-1.0, -2.0), 1.0);
    }

    #[test]
    fn test_smooth_union_blends_below_min() {
        // Equal distances get pulled down by k/4
        let d = smooth_union(1.0, 1.0, 0.4);
        assert!((d - 0.9).abs() < EPS);

        // Far apart distances are unaffected
        assert!((smooth_union(0.0, 5.0, 0.4) - 0.0).abs() < EPS);
    }

    #[test]
    fn test_smooth_union_converges_to_min() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let d1: f32 = rng.gen_range(-10.0..10.0);
            let d2: f32 = rng.gen_range(-10.0..10.0);
            let k: f32 = rng.gen_range(1e-6..1e-4);

            let smooth = smooth_union(d1, d2, k);
            assert!(
                (smooth - d1.min(d2)).abs() <= k + 1e-5,
                "smooth_union({}, {}, {}) = {} strays from min",
                d1,
                d2,
                k,
                smooth
            );
        }
    }

    #[test]
    fn test_smooth_ops_degenerate_to_hard() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let d1: f32 = rng.gen_range(-5.0..5.0);
            let d2: f32 = rng.gen_range(-5.0..5.0);

            for k in [0.0, -1.0, f32::NAN] {
                assert_eq!(smooth_union(d1, d2, k), d1.min(d2));
                assert_eq!(smooth_intersection(d1, d2, k), d1.max(d2));
                assert_eq!(smooth_subtraction(d1, d2, k), (-d1).max(d2));
            }
        }
    }

    #[test]
    fn test_smooth_ops_symmetric_limits() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let d1: f32 = rng.gen_range(-10.0..10.0);
            let d2: f32 = rng.gen_range(-10.0..10.0);
            let k = 1e-5;

            assert!((smooth_intersection(d1, d2, k) - d1.max(d2)).abs() <= k + 1e-5);
            assert!((smooth_subtraction(d1, d2, k) - (-d1).max(d2)).abs() <= k + 1e-5);
            // Union is symmetric in its operands
            assert!((smooth_union(d1, d2, 0.5) - smooth_union(d2, d1, 0.5)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_combine_dispatch() {
        assert_eq!(combine(BlendOp::Union, 1.0, 2.0, 0.0), 1.0);
        assert_eq!(combine(BlendOp::Intersection, 1.0, 2.0, 0.0), 2.0);
        assert_eq!(combine(BlendOp::Subtraction, -1.0, -2.0, 0.0), 1.0);
    }
}
