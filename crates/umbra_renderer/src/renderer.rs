//! Per-pixel parallel dispatch.
//!
//! Every pixel is independent: its index fixes the camera ray, the ray fixes
//! the color. The buffer is split into fixed-size chunks that rayon workers
//! claim, so the output is byte-identical whatever the thread count.

use std::time::{Duration, Instant};

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;
use rayon::ThreadPool;
use umbra_core::{check_target, pixel_count, Color, ConfigError, ConfigResult, FrameTransforms, RenderParams, SdfNode};
use umbra_math::{Interval, Vec3};

use crate::camera::Camera;
use crate::field::SceneField;
use crate::shading::{shade, ShadingSettings};

/// One output pixel, 8 bits per channel, laid out as R, G, B, A.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Quantize a color to 8-bit RGBA.
///
/// Channels are saturated to `[0, 1]` and truncated; no gamma is applied.
/// Alpha is always opaque.
#[inline]
pub fn color_to_rgba(color: Color) -> Rgba8 {
    let quantize = |c: f32| (255.0 * Interval::UNIT.clamp(c)) as u8;
    Rgba8::new(quantize(color.x), quantize(color.y), quantize(color.z), 255)
}

/// Summary of a finished pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    /// Pixels written
    pub pixels: usize,
    /// Wall-clock time of the dispatch, excluding validation
    pub elapsed: Duration,
}

/// Owned RGBA8 frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba8>,
}

impl ImageBuffer {
    /// Create a buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::default(); width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y). Row 0 is the top row.
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Raw bytes, four per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Consume the buffer into raw bytes, four per pixel.
    pub fn into_bytes(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

/// Render one frame of `root` into `buffer` on the global rayon pool.
///
/// All inputs are validated before any pixel is touched: on error the buffer
/// is left exactly as it was. Shape, camera and light poses are copied out of
/// `frame` first, so the caller may mutate its own transforms as soon as
/// this returns or from another thread while it runs.
pub fn render(
    buffer: &mut [Rgba8],
    width: u32,
    height: u32,
    root: &SdfNode,
    params: &RenderParams,
    frame: &FrameTransforms,
) -> ConfigResult<RenderStats> {
    let job = Job::prepare(buffer.len(), width, height, root, params, frame)?;
    Ok(job.run(buffer))
}

/// Like [`render`], but dispatches on `pool` instead of the global pool.
pub fn render_in_pool(
    pool: &ThreadPool,
    buffer: &mut [Rgba8],
    width: u32,
    height: u32,
    root: &SdfNode,
    params: &RenderParams,
    frame: &FrameTransforms,
) -> ConfigResult<RenderStats> {
    let job = Job::prepare(buffer.len(), width, height, root, params, frame)?;
    Ok(pool.install(|| job.run(buffer)))
}

/// Render into a freshly allocated [`ImageBuffer`].
pub fn render_image(
    width: u32,
    height: u32,
    root: &SdfNode,
    params: &RenderParams,
    frame: &FrameTransforms,
) -> ConfigResult<(ImageBuffer, RenderStats)> {
    // Reject bad resolutions before allocating
    let count = pixel_count(width, height)?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| ConfigError::InvalidResolution { width, height })?;
    pixels.resize(count, Rgba8::default());

    let mut image = ImageBuffer {
        width,
        height,
        pixels,
    };
    let stats = render(&mut image.pixels, width, height, root, params, frame)?;
    Ok((image, stats))
}

/// A validated, self-contained render pass.
struct Job<'a> {
    pixels: usize,
    chunk_size: usize,
    camera: Camera,
    field: SceneField<'a>,
    light_position: Vec3,
    settings: ShadingSettings,
}

impl<'a> Job<'a> {
    fn prepare(
        len: usize,
        width: u32,
        height: u32,
        root: &'a SdfNode,
        params: &RenderParams,
        frame: &FrameTransforms,
    ) -> ConfigResult<Self> {
        let pixels = check_target(width, height, len)?;
        params.validate()?;

        let camera = frame.camera.to_object(|| "camera".to_string())?;
        // Validated like every pose; shading uses only its position
        frame.light.to_object(|| "light".to_string())?;
        let field = SceneField::new(root, frame)?;

        Ok(Self {
            pixels,
            chunk_size: params.chunk_size,
            camera: Camera::new(camera, width, height),
            field,
            light_position: frame.light_position(),
            settings: ShadingSettings::from(params),
        })
    }

    fn shade_index(&self, index: usize) -> Rgba8 {
        let color = match self.camera.ray_for_index(index) {
            Some(ray) => shade(&self.field, &ray, self.light_position, &self.settings),
            None => self.settings.fog_color,
        };
        color_to_rgba(color)
    }

    fn run(&self, buffer: &mut [Rgba8]) -> RenderStats {
        let start = Instant::now();

        buffer
            .par_chunks_mut(self.chunk_size)
            .enumerate()
            .for_each(|(chunk, pixels)| {
                let base = chunk * self.chunk_size;
                for (offset, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = self.shade_index(base + offset);
                }
            });

        let elapsed = start.elapsed();
        log::debug!(
            "Rendered {}x{} ({} shapes) in {:.2?} on {} threads",
            self.camera.width(),
            self.camera.height(),
            self.field.shape_count(),
            elapsed,
            rayon::current_num_threads()
        );

        RenderStats {
            pixels: self.pixels,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::{Shape, Transform};

    fn sphere_scene() -> (SdfNode, FrameTransforms) {
        let root = SdfNode::primitive(Shape::Sphere { radius: 1.0 }, 0);
        let frame = FrameTransforms::new(
            Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            Transform::from_translation(Vec3::new(0.0, 5.0, -5.0)),
            vec![Transform::default()],
        );
        (root, frame)
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), Rgba8::new(0, 0, 0, 255));
        assert_eq!(color_to_rgba(Color::ONE), Rgba8::new(255, 255, 255, 255));
        assert_eq!(color_to_rgba(Color::new(0.5, 0.25, 1.0)), Rgba8::new(127, 63, 255, 255));
    }

    #[test]
    fn test_color_to_rgba_saturates() {
        assert_eq!(color_to_rgba(Color::new(-3.0, 7.0, 1.5)), Rgba8::new(0, 255, 255, 255));
        // NaN saturates to zero
        assert_eq!(color_to_rgba(Color::new(f32::NAN, 0.0, 0.0)).r, 0);
    }

    #[test]
    fn test_image_bytes_layout() {
        let mut image = ImageBuffer::new(2, 1);
        image.pixels[1] = Rgba8::new(1, 2, 3, 4);

        assert_eq!(image.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
        assert_eq!(image.get(1, 0), Rgba8::new(1, 2, 3, 4));
    }

    #[test]
    fn test_render_fills_every_pixel() {
        let (root, frame) = sphere_scene();
        let mut buffer = vec![Rgba8::default(); 8 * 6];

        let stats = render(&mut buffer, 8, 6, &root, &RenderParams::default(), &frame).unwrap();

        assert_eq!(stats.pixels, 48);
        assert!(buffer.iter().all(|pixel| pixel.a == 255));
    }

    #[test]
    fn test_rejects_buffer_mismatch_untouched() {
        let (root, frame) = sphere_scene();
        let mut buffer = vec![Rgba8::new(9, 9, 9, 9); 10];

        let err = render(&mut buffer, 4, 4, &root, &RenderParams::default(), &frame).unwrap_err();

        assert_eq!(err, ConfigError::BufferSize { expected: 16, actual: 10 });
        assert!(buffer.iter().all(|&pixel| pixel == Rgba8::new(9, 9, 9, 9)));
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let (root, frame) = sphere_scene();
        let mut buffer = Vec::new();

        let err = render(&mut buffer, 0, 4, &root, &RenderParams::default(), &frame).unwrap_err();
        assert_eq!(err, ConfigError::InvalidResolution { width: 0, height: 4 });
    }

    #[test]
    fn test_oversized_image_is_an_error() {
        let (root, frame) = sphere_scene();
        let params = RenderParams::default();

        for (width, height) in [(u32::MAX, u32::MAX), (70_000, 70_000), (1, u32::MAX)] {
            assert_eq!(
                render_image(width, height, &root, &params, &frame).unwrap_err(),
                ConfigError::InvalidResolution { width, height }
            );
        }
    }

    #[test]
    fn test_rejects_degenerate_camera() {
        let (root, mut frame) = sphere_scene();
        frame.camera = frame.camera.with_scale(0.0);

        assert!(matches!(
            render_image(4, 4, &root, &RenderParams::default(), &frame),
            Err(ConfigError::DegenerateTransform(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let (root, frame) = sphere_scene();
        let params = RenderParams {
            max_steps: 0,
            ..Default::default()
        };

        assert_eq!(
            render_image(4, 4, &root, &params, &frame).unwrap_err(),
            ConfigError::MaxSteps
        );
    }

    #[test]
    fn test_light_position_drives_shading() {
        let (root, mut frame) = sphere_scene();
        let params = RenderParams::default();

        let (front, _) = render_image(4, 4, &root, &params, &frame).unwrap();
        // Light moved behind the sphere leaves the visible side dark
        frame.light.translation = Vec3::new(0.0, 0.0, 5.0);
        let (back, _) = render_image(4, 4, &root, &params, &frame).unwrap();

        assert!(front.get(2, 2).r > back.get(2, 2).r);
    }

    #[test]
    fn test_chunk_size_larger_than_image() {
        let (root, frame) = sphere_scene();
        let small = RenderParams {
            chunk_size: 1,
            ..Default::default()
        };
        let huge = RenderParams {
            chunk_size: 10_000,
            ..Default::default()
        };

        let (a, _) = render_image(5, 3, &root, &small, &frame).unwrap();
        let (b, _) = render_image(5, 3, &root, &huge, &frame).unwrap();
        assert_eq!(a, b);
    }
}
