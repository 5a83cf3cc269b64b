//! Direct lighting with one shadow ray and distance fog.

use umbra_core::{Color, RenderParams};
use umbra_math::{Interval, Ray, Vec3};

use crate::field::DistanceField;
use crate::tracer::{march, March, TraceSettings};

/// Everything the shading of a single primary ray depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingSettings {
    pub trace: TraceSettings,
    /// Finite-difference offset for normal estimation
    pub normal_epsilon: f32,
    pub fog_exponent: f32,
    pub fog_color: Color,
    pub surface_color: Color,
    /// Light multiplier for occluded points
    pub shadow_attenuation: f32,
    /// Darkening per used fraction of the step budget
    pub step_falloff: f32,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self::from(&RenderParams::default())
    }
}

impl From<&RenderParams> for ShadingSettings {
    fn from(params: &RenderParams) -> Self {
        Self {
            trace: TraceSettings::from(params),
            normal_epsilon: params.normal_epsilon,
            fog_exponent: params.fog_exponent,
            fog_color: params.fog_color,
            surface_color: params.surface_color,
            shadow_attenuation: params.shadow_attenuation,
            step_falloff: params.step_falloff,
        }
    }
}

/// Surface normal at `p` from central differences of the field.
///
/// Returns +Y where the gradient vanishes or is not finite.
pub fn estimate_normal<F: DistanceField + ?Sized>(field: &F, p: Vec3, epsilon: f32) -> Vec3 {
    let ex = Vec3::new(epsilon, 0.0, 0.0);
    let ey = Vec3::new(0.0, epsilon, 0.0);
    let ez = Vec3::new(0.0, 0.0, epsilon);

    let gradient = Vec3::new(
        field.distance(p + ex) - field.distance(p - ex),
        field.distance(p + ey) - field.distance(p - ey),
        field.distance(p + ez) - field.distance(p - ez),
    );

    gradient.try_normalize().unwrap_or(Vec3::Y)
}

/// Lambertian term, clamped to non-negative.
#[inline]
pub fn lambert(normal: Vec3, light_direction: Vec3) -> f32 {
    normal.dot(light_direction).max(0.0)
}

/// Light multiplier for a march that used part of its step budget.
///
/// Rays that need many steps pass close to geometry, so darkening them gives
/// a cheap occlusion-like falloff.
#[inline]
pub fn step_attenuation(result: &March, settings: &ShadingSettings) -> f32 {
    1.0 - settings.step_falloff * result.step_ratio(&settings.trace)
}

/// Blend factor toward the fog color for a ray that travelled `distance`.
#[inline]
pub fn fog_factor(distance: f32, settings: &ShadingSettings) -> f32 {
    let t = Interval::new(0.0, settings.trace.max_distance).normalize(distance);
    t.powf(settings.fog_exponent)
}

/// Light multiplier at surface point `p` with normal `normal`.
///
/// Casts a ray toward the light from just above the surface. Returns 1 if
/// nothing blocks it, otherwise the shadow attenuation scaled by the shadow
/// ray's own step falloff.
pub fn shadow<F: DistanceField + ?Sized>(
    field: &F,
    p: Vec3,
    normal: Vec3,
    light_position: Vec3,
    settings: &ShadingSettings,
) -> f32 {
    let origin = p + normal * settings.trace.surface_distance * 2.0;
    let to_light = light_position - origin;

    let Some(ray) = Ray::new(origin, to_light) else {
        // Light sits on the surface
        return 1.0;
    };

    let result = march(field, &ray, &settings.trace);
    if result.hit && result.distance < to_light.length() {
        settings.shadow_attenuation * step_attenuation(&result, settings)
    } else {
        1.0
    }
}

/// Color seen along a primary ray, saturated to `[0, 1]`.
pub fn shade<F: DistanceField + ?Sized>(
    field: &F,
    ray: &Ray,
    light_position: Vec3,
    settings: &ShadingSettings,
) -> Color {
    let primary = march(field, ray, &settings.trace);
    if !primary.hit {
        return settings.fog_color.clamp(Color::ZERO, Color::ONE);
    }

    let p = ray.at(primary.distance);
    let normal = estimate_normal(field, p, settings.normal_epsilon);

    let diffuse = (light_position - p)
        .try_normalize()
        .map_or(0.0, |light_direction| lambert(normal, light_direction));

    let mut intensity = diffuse * step_attenuation(&primary, settings);
    if intensity > 0.0 {
        intensity *= shadow(field, p, normal, light_position, settings);
    }

    let lit = settings.surface_color * intensity;
    let color = lit.lerp(settings.fog_color, fog_factor(primary.distance, settings));

    if !color.is_finite() {
        log::trace!("Non-finite shade at {:?}, using fog", p);
        return settings.fog_color.clamp(Color::ZERO, Color::ONE);
    }
    color.clamp(Color::ZERO, Color::ONE)
}
