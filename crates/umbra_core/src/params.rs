//! Render parameters shared by every pixel of a pass.

use serde::{Deserialize, Serialize};
use umbra_math::{Interval, Vec3};

use crate::error::{ConfigError, ConfigResult};

/// Color type alias (linear RGB, 0-1)
pub type Color = Vec3;

/// Tracer, shading and dispatch settings for one render pass.
///
/// Every field has a default, so scene files only need to list the values
/// they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Maximum sphere-tracing iterations per ray
    pub max_steps: u32,
    /// Rays that travel further than this escape into the fog
    pub max_distance: f32,
    /// Distance below which a ray counts as touching a surface
    pub surface_distance: f32,
    /// Finite-difference offset for normal estimation
    pub normal_epsilon: f32,
    /// Power applied to normalized travel distance before fog blending
    pub fog_exponent: f32,
    pub fog_color: Color,
    pub surface_color: Color,
    /// Light multiplier for occluded points (0 = black shadows)
    pub shadow_attenuation: f32,
    /// How strongly the step count of a ray darkens it (0 = disabled)
    pub step_falloff: f32,
    /// Pixels per parallel work item
    pub chunk_size: usize,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            max_steps: 100,
            max_distance: 100.0,
            surface_distance: 0.01,
            normal_epsilon: 0.001,
            fog_exponent: 2.0,
            fog_color: Color::new(0.6, 0.7, 0.8),
            surface_color: Color::new(0.9, 0.8, 0.7),
            shadow_attenuation: 0.2,
            step_falloff: 0.5,
            chunk_size: 64,
        }
    }
}

impl RenderParams {
    /// Check every field against the range the renderer can work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_steps == 0 {
            return Err(ConfigError::MaxSteps);
        }
        if !is_positive(self.max_distance) {
            return Err(ConfigError::MaxDistance(self.max_distance));
        }
        if !is_positive(self.surface_distance) {
            return Err(ConfigError::SurfaceDistance(self.surface_distance));
        }
        if !is_positive(self.normal_epsilon) {
            return Err(ConfigError::NormalEpsilon(self.normal_epsilon));
        }
        if !is_positive(self.fog_exponent) {
            return Err(ConfigError::FogExponent(self.fog_exponent));
        }
        if !Interval::UNIT.contains(self.shadow_attenuation) {
            return Err(ConfigError::ShadowAttenuation(self.shadow_attenuation));
        }
        if !Interval::UNIT.contains(self.step_falloff) {
            return Err(ConfigError::StepFalloff(self.step_falloff));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ChunkSize);
        }
        if !self.fog_color.is_finite() {
            return Err(ConfigError::NonFiniteColor("fog"));
        }
        if !self.surface_color.is_finite() {
            return Err(ConfigError::NonFiniteColor("surface"));
        }
        if self.surface_distance >= self.max_distance {
            log::warn!(
                "surface_distance {} is not small relative to max_distance {}",
                self.surface_distance,
                self.max_distance
            );
        }
        Ok(())
    }

    /// Set the tracer limits.
    pub fn with_tracing(mut self, max_steps: u32, max_distance: f32, surface_distance: f32) -> Self {
        self.max_steps = max_steps;
        self.max_distance = max_distance;
        self.surface_distance = surface_distance;
        self
    }

    /// Set the fog color and falloff exponent.
    pub fn with_fog(mut self, color: Color, exponent: f32) -> Self {
        self.fog_color = color;
        self.fog_exponent = exponent;
        self
    }

    /// Set the surface color.
    pub fn with_surface_color(mut self, color: Color) -> Self {
        self.surface_color = color;
        self
    }
}

/// Largest pixel count a single frame may have (16384 x 16384).
pub const MAX_PIXELS: usize = 1 << 28;

/// Pixel count of a `width` x `height` frame.
///
/// Fails for an empty frame or one larger than [`MAX_PIXELS`].
pub fn pixel_count(width: u32, height: u32) -> ConfigResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&count| count > 0 && count <= MAX_PIXELS)
        .ok_or(ConfigError::InvalidResolution { width, height })
}

/// Check that a `width` x `height` target backed by `len` pixels is usable.
///
/// Returns the pixel count on success.
pub fn check_target(width: u32, height: u32, len: usize) -> ConfigResult<usize> {
    let expected = pixel_count(width, height)?;

    if len != expected {
        return Err(ConfigError::BufferSize {
            expected,
            actual: len,
        });
    }
    Ok(expected)
}

#[inline]
fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
