//! Time-driven pose behaviours.
//!
//! Each animation is a closed-form function of time applied on top of the
//! scene's starting poses, so any frame can be produced directly without
//! stepping through the ones before it.

use serde::{Deserialize, Serialize};
use umbra_math::{Quat, Vec3};

use crate::error::{ConfigError, ConfigResult};
use crate::scene::{FrameTransforms, Transform};

/// Which pose an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Camera,
    Light,
    Shape(usize),
}

/// Frame of reference for spinning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    /// Rotate about the object's own axes
    #[default]
    Local,
    /// Rotate about the world axes
    World,
}

/// A behaviour that moves or turns one pose over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Animation {
    /// Circle the starting position in the horizontal plane.
    Orbit {
        target: Target,
        radius: f32,
        /// Radians per second
        speed: f32,
    },
    /// Move up and down around the starting position.
    Bob {
        target: Target,
        magnitude: f32,
        /// Radians per second
        speed: f32,
    },
    /// Rotate at a constant angular velocity.
    ///
    /// `degrees_per_second` is the per-axis rate. Turning by a small Euler
    /// step every frame converges to a rotation about the fixed axis
    /// `normalize(rate)` at `length(rate)` degrees per second, which is what
    /// this evaluates.
    Spin {
        target: Target,
        degrees_per_second: Vec3,
        #[serde(default)]
        space: Space,
    },
}

impl Animation {
    /// The pose this animation drives.
    pub fn target(&self) -> Target {
        match *self {
            Animation::Orbit { target, .. }
            | Animation::Bob { target, .. }
            | Animation::Spin { target, .. } => target,
        }
    }

    /// Check the target exists and the rates are finite.
    pub fn validate(&self, shape_count: usize) -> ConfigResult<()> {
        if let Target::Shape(index) = self.target() {
            if index >= shape_count {
                return Err(ConfigError::MissingTransform {
                    index,
                    available: shape_count,
                });
            }
        }

        let finite = match *self {
            Animation::Orbit { radius, speed, .. } => radius.is_finite() && speed.is_finite(),
            Animation::Bob {
                magnitude, speed, ..
            } => magnitude.is_finite() && speed.is_finite(),
            Animation::Spin {
                degrees_per_second, ..
            } => degrees_per_second.is_finite(),
        };
        if !finite {
            return Err(ConfigError::DegenerateTransform(format!("{:?} animation", self.target())));
        }
        Ok(())
    }

    /// Apply this animation to `transform` at `time` seconds.
    ///
    /// `base` is the pose at time zero.
    fn apply(&self, base: &Transform, transform: &mut Transform, time: f32) {
        match *self {
            Animation::Orbit { radius, speed, .. } => {
                let angle = time * speed;
                transform.translation =
                    base.translation + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius;
            }
            Animation::Bob {
                magnitude, speed, ..
            } => {
                transform.translation = base.translation + Vec3::Y * (time * speed).sin() * magnitude;
            }
            Animation::Spin {
                degrees_per_second,
                space,
                ..
            } => {
                let radians_per_second = degrees_per_second * (std::f32::consts::PI / 180.0);
                let spin = Quat::from_scaled_axis(radians_per_second * time);
                transform.rotation = match space {
                    Space::Local => base.rotation * spin,
                    Space::World => spin * base.rotation,
                }
                .normalize();
            }
        }
    }
}

/// Evaluate `animations` on top of `base` at `time` seconds.
///
/// Animations run in order; two animations on the same pose compose only if
/// they drive different components (position vs. rotation). Animations
/// targeting a missing shape are skipped.
pub fn animate(base: &FrameTransforms, animations: &[Animation], time: f32) -> FrameTransforms {
    let mut frame = base.clone();

    for animation in animations {
        let (start, current) = match animation.target() {
            Target::Camera => (&base.camera, &mut frame.camera),
            Target::Light => (&base.light, &mut frame.light),
            Target::Shape(index) => match (base.shapes.get(index), frame.shapes.get_mut(index)) {
                (Some(start), Some(current)) => (start, current),
                _ => {
                    log::warn!("Skipping animation for missing shape {}", index);
                    continue;
                }
            },
        };
        animation.apply(start, current, time);
    }

    frame
}
