use std::any::Any;

use crate::paint::{Paint, RenderTargetDescriptor};

/// Vertical orientation of a wrapped render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOrigin {
    /// GL framebuffer convention: row zero at the bottom.
    BottomLeft,
    TopLeft,
}

/// Color spaces the host may render in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    WideGamut,
}

/// Pixel interpretation of a surface's color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Rgba8888,
    RgbaF16,
}

impl ColorType {
    /// Sized GL internal format for this color type.
    #[inline]
    pub fn pixel_format(self) -> u32 {
        match self {
            ColorType::Rgba8888 => glow::RGBA8,
            ColorType::RgbaF16 => glow::RGBA16F,
        }
    }
}

/// Color type and pixel format derived from an optional color space.
///
/// sRGB (or unspecified) content renders into 8-bit RGBA; wide-gamut content
/// needs the F16 format to avoid banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSettings {
    pub color_type: ColorType,
    pub pixel_format: u32,
}

impl ColorSettings {
    pub fn for_space(space: Option<ColorSpace>) -> Self {
        let color_type = match space {
            None | Some(ColorSpace::Srgb) => ColorType::Rgba8888,
            Some(ColorSpace::WideGamut) => ColorType::RgbaF16,
        };

        Self {
            color_type,
            pixel_format: color_type.pixel_format(),
        }
    }
}

/// Factory for per-thread GPU paint contexts.
///
/// Implemented by the host over its canvas library's GPU backend; invoked at
/// most once per rendering thread, from that thread, with a GL context
/// current.
pub trait PaintBackend: Send + Sync {
    /// Builds a GPU paint context from the calling thread's native GL
    /// interface. `None` means the backend could not bind to GL.
    fn make_context(&self) -> Option<Box<dyn PaintContext>>;
}

/// Thread-affine GPU state of the canvas library.
pub trait PaintContext: Send {
    /// Drops any GL state assumptions cached since the last draw.
    ///
    /// Precondition of every draw: sibling surfaces on the same thread share
    /// this context and mutate GL state between frames, so state must be
    /// reset before each use.
    fn reset_state(&mut self);

    /// Maximum supported sample count for `color_type`.
    fn max_sample_count(&self, color_type: ColorType) -> i32;

    /// Wraps a framebuffer-backed render target into a drawable surface.
    ///
    /// No color-space or surface-properties overrides are applied.
    fn wrap_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
        origin: SurfaceOrigin,
        color_type: ColorType,
    ) -> Option<Box<dyn PaintSurface>>;
}

/// A GPU-backed paintable surface.
pub trait PaintSurface: Send {
    /// Canvas drawing into this surface, valid for the current frame only.
    fn canvas(&mut self) -> &mut dyn Canvas;

    /// Flushes recorded drawing and submits it to the GPU queue.
    fn flush_and_submit(&mut self);

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Downcast hook for hosts that wrap surfaces into scripting objects.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Host canvas handed to draw callbacks.
///
/// Callbacks must not retain the canvas past the call. The engine itself
/// draws only diagnostics; hosts reach their full canvas API by downcasting
/// through [`Canvas::as_any_mut`].
pub trait Canvas {
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint);

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
