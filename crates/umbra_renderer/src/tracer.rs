//! Sphere tracing.
//!
//! A ray is advanced by exactly the distance the field reports at its current
//! position. Because the field never overestimates, a step can never jump
//! through a surface.

use umbra_core::RenderParams;
use umbra_math::Ray;

use crate::field::DistanceField;

/// Limits for a single march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSettings {
    /// Maximum number of field samples
    pub max_steps: u32,
    /// Travel distance after which the ray has escaped
    pub max_distance: f32,
    /// Distance below which the ray has reached a surface
    pub surface_distance: f32,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self::from(&RenderParams::default())
    }
}

impl From<&RenderParams> for TraceSettings {
    fn from(params: &RenderParams) -> Self {
        Self {
            max_steps: params.max_steps,
            max_distance: params.max_distance,
            surface_distance: params.surface_distance,
        }
    }
}

/// Outcome of a march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct March {
    /// Accumulated travel distance along the ray
    pub distance: f32,
    /// Number of field samples taken
    pub steps: u32,
    /// True if the march converged on a surface within `max_distance`
    pub hit: bool,
}

impl March {
    /// Fraction of the step budget this march used, in `[0, 1]`.
    #[inline]
    pub fn step_ratio(&self, settings: &TraceSettings) -> f32 {
        (self.steps as f32 / settings.max_steps.max(1) as f32).min(1.0)
    }
}

/// March `ray` through `field`.
///
/// Stops on convergence (`hit`), on escaping past `max_distance`, or when the
/// step budget runs out. In the last two cases the returned distance is the
/// best-effort travel so far and `hit` is false. A non-finite sample also ends
/// the march as a miss.
pub fn march<F: DistanceField + ?Sized>(field: &F, ray: &Ray, settings: &TraceSettings) -> March {
    let mut distance = 0.0;
    let mut steps = 0;

    while steps < settings.max_steps {
        let sample = field.distance(ray.at(distance));
        steps += 1;

        if !sample.is_finite() {
            return March {
                distance,
                steps,
                hit: false,
            };
        }

        distance += sample;

        if sample < settings.surface_distance {
            return March {
                distance,
                steps,
                hit: distance <= settings.max_distance,
            };
        }
        if distance > settings.max_distance {
            break;
        }
    }

    March {
        distance,
        steps,
        hit: false,
    }
}
