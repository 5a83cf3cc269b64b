//! Built-in scenes.

use umbra_math::Vec3;

use crate::animation::{Animation, Space, Target};
use crate::params::{Color, RenderParams};
use crate::scene::{FrameTransforms, SceneDescription, Transform};
use crate::tree::{SdfNode, Shape};

/// Names accepted by [`by_name`].
pub const PRESET_NAMES: &[&str] = &["sphere-plane", "blend"];

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<SceneDescription> {
    match name {
        "sphere-plane" => Some(sphere_plane()),
        "blend" => Some(blend()),
        _ => None,
    }
}

/// Unit sphere resting on the plane `y = -1`, seen from `(0, 0, -5)`.
pub fn sphere_plane() -> SceneDescription {
    let root = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0)
        .union(SdfNode::primitive(Shape::plane(Vec3::Y), 1));

    let transforms = FrameTransforms::new(
        Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)),
        Transform::from_translation(Vec3::new(2.0, 4.0, -3.0)),
        vec![
            Transform::default(),
            Transform::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        ],
    );

    SceneDescription::new("sphere-plane", root, transforms)
}

/// Several shapes melted together with smooth unions, a hollowed cube and an
/// orbiting light.
pub fn blend() -> SceneDescription {
    const SPHERE: usize = 0;
    const ROUND_BOX: usize = 1;
    const TORUS: usize = 2;
    const CUBE: usize = 3;
    const CARVER: usize = 4;
    const GROUND: usize = 5;

    let blob = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, SPHERE)
        .smooth_union(
            SdfNode::primitive(
                Shape::Torus {
                    major_radius: 1.0,
                    minor_radius: 0.25,
                },
                TORUS,
            ),
            0.5,
        )
        .smooth_union(
            SdfNode::primitive(
                Shape::RoundBox {
                    half_extents: Vec3::splat(0.5),
                    radius: 0.1,
                },
                ROUND_BOX,
            ),
            0.5,
        );

    let hollow_cube = SdfNode::primitive(
        Shape::Box {
            half_extents: Vec3::splat(0.75),
        },
        CUBE,
    )
    .smooth_subtract(SdfNode::primitive(Shape::Sphere { radius: 0.95 }, CARVER), 0.05);

    let root = blob
        .union(hollow_cube)
        .smooth_union(SdfNode::primitive(Shape::plane(Vec3::Y), GROUND), 0.3);

    let transforms = FrameTransforms::new(
        Transform::looking_at(Vec3::new(0.0, 3.0, -7.0), Vec3::new(0.0, 0.0, 0.5), Vec3::Y),
        Transform::from_translation(Vec3::new(0.0, 4.0, -1.0)),
        vec![
            Transform::from_translation(Vec3::new(-1.5, 0.0, 0.0)),
            Transform::from_translation(Vec3::new(1.5, 0.0, 0.0)),
            Transform::from_translation(Vec3::new(0.0, 0.5, 0.0)),
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.5)),
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.5)),
            Transform::from_translation(Vec3::new(0.0, -1.5, 0.0)),
        ],
    );

    let params = RenderParams::default()
        .with_surface_color(Color::new(0.9, 0.55, 0.3))
        .with_fog(Color::new(0.55, 0.65, 0.8), 1.5);

    SceneDescription::new("blend", root, transforms)
        .with_params(params)
        .with_animation(Animation::Orbit {
            target: Target::Light,
            radius: 3.0,
            speed: 1.0,
        })
        .with_animation(Animation::Bob {
            target: Target::Shape(TORUS),
            magnitude: 0.5,
            speed: 1.0,
        })
        .with_animation(Animation::Spin {
            target: Target::Shape(ROUND_BOX),
            degrees_per_second: Vec3::new(30.0, 45.0, 0.0),
            space: Space::Local,
        })
}
