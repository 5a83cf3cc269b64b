//! Scene description types for Umbra.
//!
//! A scene is a fixed composition tree plus the poses that change every
//! frame. The renderer only ever sees a `FrameTransforms` value, an owned
//! snapshot of the poses taken before a pass starts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use umbra_math::{Mat4, ObjectTransform, Quat, Vec3};

use crate::animation::{animate, Animation};
use crate::error::{ConfigError, ConfigResult, SceneResult};
use crate::params::RenderParams;
use crate::tree::SdfNode;

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a new transform with translation and rotation.
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            ..Default::default()
        }
    }

    /// A pose at `eye` whose local +Z axis points at `target`.
    ///
    /// Local +Y stays as close to `up` as possible. If `target` lies straight
    /// along `up` the shortest rotation from +Z is used instead.
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let Some(forward) = (target - eye).try_normalize() else {
            return Self::from_translation(eye);
        };

        let rotation = match up.cross(forward).try_normalize() {
            Some(right) => {
                let true_up = forward.cross(right);
                Quat::from_mat3(&umbra_math::Mat3::from_cols(right, true_up, forward))
            }
            None => Quat::from_rotation_arc(Vec3::Z, forward),
        };

        Self::from_translation_rotation(eye, rotation)
    }

    /// Set a uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.normalize(), self.translation)
    }

    /// Build the world/local matrix pair for a render pass.
    ///
    /// `label` names the transform in the error if it is degenerate.
    pub fn to_object(&self, label: impl FnOnce() -> String) -> ConfigResult<ObjectTransform> {
        if !self.rotation.is_finite() || self.rotation.length_squared() < 1e-12 {
            return Err(ConfigError::DegenerateTransform(label()));
        }
        ObjectTransform::new(self.to_matrix()).ok_or_else(|| ConfigError::DegenerateTransform(label()))
    }
}

/// Poses for one frame: camera, light and every shape transform the scene
/// tree refers to by index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTransforms {
    pub camera: Transform,
    pub light: Transform,
    pub shapes: Vec<Transform>,
}

impl FrameTransforms {
    /// Create a snapshot from a camera, a light and the shape poses.
    pub fn new(camera: Transform, light: Transform, shapes: Vec<Transform>) -> Self {
        Self {
            camera,
            light,
            shapes,
        }
    }

    /// Light position in world space.
    pub fn light_position(&self) -> Vec3 {
        self.light.translation
    }
}

/// A complete renderable scene: composition tree, starting poses, animation
/// and render settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Scene name (usually from filename or preset)
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub params: RenderParams,

    /// Composition tree
    pub root: SdfNode,

    /// Poses at time zero
    pub transforms: FrameTransforms,

    /// Behaviours applied to the poses over time
    #[serde(default)]
    pub animations: Vec<Animation>,
}

impl SceneDescription {
    /// Create a static scene.
    pub fn new(name: impl Into<String>, root: SdfNode, transforms: FrameTransforms) -> Self {
        Self {
            name: name.into(),
            params: RenderParams::default(),
            root,
            transforms,
            animations: Vec::new(),
        }
    }

    /// Set the render parameters.
    pub fn with_params(mut self, params: RenderParams) -> Self {
        self.params = params;
        self
    }

    /// Add an animation.
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    /// Validate parameters and tree against the starting poses.
    pub fn validate(&self) -> ConfigResult<()> {
        self.params.validate()?;
        self.root.validate(self.transforms.shapes.len())?;
        for animation in &self.animations {
            animation.validate(self.transforms.shapes.len())?;
        }
        Ok(())
    }

    /// Poses at `time` seconds.
    pub fn frame_at(&self, time: f32) -> FrameTransforms {
        animate(&self.transforms, &self.animations, time)
    }

    /// Parse and validate a scene from JSON.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let mut scene: SceneDescription = serde_json::from_str(json)?;

        let fixed = scene.root.normalize_planes();
        if fixed > 0 {
            log::warn!("Scene '{}': normalized {} plane normal(s)", scene.name, fixed);
        }

        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene from a JSON file.
    ///
    /// An empty name is replaced with the file stem.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut scene = Self::from_json(&json)?;

        if scene.name.is_empty() {
            scene.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        log::info!(
            "Loaded scene '{}': {} primitives, {} shape transforms, {} animations",
            scene.name,
            scene.root.primitive_count(),
            scene.transforms.shapes.len(),
            scene.animations.len()
        );
        Ok(scene)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
