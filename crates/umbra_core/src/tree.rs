//! Scene composition as data.
//!
//! A scene's shape is a small expression tree: leaves are primitive shapes
//! placed by one of the frame's shape transforms, internal nodes combine two
//! subtrees with a (possibly smooth) boolean operator. The tree is fixed for a
//! frame; only the transforms it points at change over time.

use serde::{Deserialize, Serialize};
use umbra_math::Vec3;

use crate::error::{ConfigError, ConfigResult};

/// Tolerance for accepting a plane normal as unit length.
const UNIT_TOLERANCE: f32 = 1e-3;

/// Parameters of a primitive shape, in the shape's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Sphere centered on the origin
    Sphere { radius: f32 },
    /// Axis-aligned box centered on the origin
    Box { half_extents: Vec3 },
    /// Box with edges rounded by `radius` (grows the box by `radius`)
    RoundBox { half_extents: Vec3, radius: f32 },
    /// Infinite plane through the origin
    Plane { normal: Vec3 },
    /// Ring in the local XZ plane
    Torus { major_radius: f32, minor_radius: f32 },
}

impl Shape {
    /// A plane with the given normal, normalized.
    ///
    /// Falls back to +Y for a zero-length normal.
    pub fn plane(normal: Vec3) -> Self {
        Shape::Plane {
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
        }
    }

    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "sphere",
            Shape::Box { .. } => "box",
            Shape::RoundBox { .. } => "round box",
            Shape::Plane { .. } => "plane",
            Shape::Torus { .. } => "torus",
        }
    }

    /// Check that the parameters describe a real shape.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason| ConfigError::InvalidShape {
            shape: self.name(),
            reason,
        };

        match *self {
            Shape::Sphere { radius } => {
                if !is_non_negative(radius) {
                    return Err(invalid("radius must be finite and non-negative"));
                }
            }
            Shape::Box { half_extents } => {
                if !is_non_negative_vec(half_extents) {
                    return Err(invalid("half extents must be finite and non-negative"));
                }
            }
            Shape::RoundBox {
                half_extents,
                radius,
            } => {
                if !is_non_negative_vec(half_extents) {
                    return Err(invalid("half extents must be finite and non-negative"));
                }
                if !is_non_negative(radius) {
                    return Err(invalid("radius must be finite and non-negative"));
                }
            }
            Shape::Plane { normal } => {
                if !normal.is_finite() || (normal.length() - 1.0).abs() > UNIT_TOLERANCE {
                    return Err(invalid("normal must be unit length"));
                }
            }
            Shape::Torus {
                major_radius,
                minor_radius,
            } => {
                if !is_non_negative(major_radius) || !is_non_negative(minor_radius) {
                    return Err(invalid("radii must be finite and non-negative"));
                }
            }
        }
        Ok(())
    }
}

/// Boolean operator of an internal tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendOp {
    /// Keep both operands
    Union,
    /// Remove operand `a` from operand `b`
    Subtraction,
    /// Keep only the overlap
    Intersection,
}

/// A node of the scene composition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SdfNode {
    /// A primitive placed by `FrameTransforms::shapes[transform]`
    Primitive { shape: Shape, transform: usize },
    /// Two subtrees joined by `op`; `blend > 0` rounds the seam over that radius
    Combine {
        op: BlendOp,
        #[serde(default)]
        blend: f32,
        a: Box<SdfNode>,
        b: Box<SdfNode>,
    },
}

impl SdfNode {
    /// Create a leaf node.
    pub fn primitive(shape: Shape, transform: usize) -> Self {
        SdfNode::Primitive { shape, transform }
    }

    /// Create an internal node applying `op(a, b)`.
    pub fn combine(op: BlendOp, blend: f32, a: SdfNode, b: SdfNode) -> Self {
        SdfNode::Combine {
            op,
            blend,
            a: Box::new(a),
            b: Box::new(b),
        }
    }

    /// Hard union with another subtree.
    pub fn union(self, other: SdfNode) -> Self {
        Self::combine(BlendOp::Union, 0.0, self, other)
    }

    /// Union blended over `blend` units.
    pub fn smooth_union(self, other: SdfNode, blend: f32) -> Self {
        Self::combine(BlendOp::Union, blend, self, other)
    }

    /// Carve `tool` out of this subtree, blended over `blend` units.
    pub fn smooth_subtract(self, tool: SdfNode, blend: f32) -> Self {
        Self::combine(BlendOp::Subtraction, blend, tool, self)
    }

    /// Intersection with another subtree, blended over `blend` units.
    pub fn smooth_intersect(self, other: SdfNode, blend: f32) -> Self {
        Self::combine(BlendOp::Intersection, blend, self, other)
    }

    /// Number of primitive leaves in the tree.
    pub fn primitive_count(&self) -> usize {
        match self {
            SdfNode::Primitive { .. } => 1,
            SdfNode::Combine { a, b, .. } => a.primitive_count() + b.primitive_count(),
        }
    }

    /// Check shapes, blend radii and that every leaf refers to one of
    /// `transform_count` shape transforms.
    pub fn validate(&self, transform_count: usize) -> ConfigResult<()> {
        match self {
            SdfNode::Primitive { shape, transform } => {
                if *transform >= transform_count {
                    return Err(ConfigError::MissingTransform {
                        index: *transform,
                        available: transform_count,
                    });
                }
                shape.validate()
            }
            SdfNode::Combine { blend, a, b, .. } => {
                if !is_non_negative(*blend) {
                    return Err(ConfigError::InvalidShape {
                        shape: "combinator",
                        reason: "blend must be finite and non-negative",
                    });
                }
                a.validate(transform_count)?;
                b.validate(transform_count)
            }
        }
    }

    /// Normalize plane normals in place, returning how many were changed.
    ///
    /// Hand-written scene files often carry normals like `[0, 2, 0]`.
    pub fn normalize_planes(&mut self) -> usize {
        match self {
            SdfNode::Primitive {
                shape: Shape::Plane { normal },
                ..
            } => match normal.try_normalize() {
                Some(unit) if (normal.length() - 1.0).abs() > UNIT_TOLERANCE => {
                    *normal = unit;
                    1
                }
                _ => 0,
            },
            SdfNode::Primitive { .. } => 0,
            SdfNode::Combine { a, b, .. } => a.normalize_planes() + b.normalize_planes(),
        }
    }
}

#[inline]
fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

#[inline]
fn is_non_negative_vec(value: Vec3) -> bool {
    value.is_finite() && value.min_element() >= 0.0
}
