use anyhow::Result;

use crate::window::NativeWindow;

use super::handles::{Config, Context, Display, Surface};

/// Framebuffer configuration request.
///
/// The defaults ask for ES2-class rendering into an 8-bit RGBA framebuffer
/// with no depth or stencil, usable for both pixel-buffer and window
/// surfaces. Add fields only when a concrete platform requirement exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    pub red_bits: i32,
    pub green_bits: i32,
    pub blue_bits: i32,
    pub alpha_bits: i32,
    pub depth_bits: i32,
    pub stencil_bits: i32,

    /// Request pixel-buffer surface support.
    pub pbuffer_surfaces: bool,

    /// Request window surface support.
    pub window_surfaces: bool,
}

impl Default for ConfigRequest {
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 0,
            stencil_bits: 0,
            pbuffer_surfaces: true,
            window_surfaces: true,
        }
    }
}

/// Platform GL/EGL entry points used by the renderers.
///
/// All operations execute synchronously on the calling thread; the contexts
/// and surfaces produced here are thread-affine. Fallible operations return
/// an error chain carrying the underlying platform error code.
pub trait GlDriver: Send + Sync {
    /// Returns the default display.
    fn default_display(&self) -> Result<Display>;

    /// Initializes `display`, returning the platform (major, minor) version.
    fn initialize_display(&self, display: Display) -> Result<(i32, i32)>;

    /// Chooses a framebuffer configuration satisfying `request`.
    fn choose_config(&self, display: Display, request: &ConfigRequest) -> Result<Config>;

    /// Creates a rendering context for `config` with the given ES client
    /// version.
    fn create_context(
        &self,
        display: Display,
        config: Config,
        client_version: i32,
    ) -> Result<Context>;

    /// Creates an off-screen pixel-buffer surface of fixed size.
    fn create_pbuffer_surface(
        &self,
        display: Display,
        config: Config,
        width: i32,
        height: i32,
    ) -> Result<Surface>;

    /// Creates a surface backed by a native window.
    fn create_window_surface(
        &self,
        display: Display,
        config: Config,
        window: &dyn NativeWindow,
    ) -> Result<Surface>;

    /// Binds `surface` and `context` to the calling thread.
    fn make_current(&self, display: Display, surface: Surface, context: Context) -> Result<()>;

    /// Presents `surface` via a buffer swap.
    fn swap_buffers(&self, display: Display, surface: Surface) -> Result<()>;

    /// Releases the platform resources behind `surface`.
    fn destroy_surface(&self, display: Display, surface: Surface) -> Result<()>;

    /// Sets the GL viewport on the current context.
    fn set_viewport(&self, width: i32, height: i32);

    /// Clears the color buffer of the current surface to transparent.
    fn clear_to_transparent(&self);

    /// Framebuffer object currently bound on this thread.
    fn framebuffer_binding(&self) -> i32;

    /// Stencil bit depth of the current framebuffer.
    fn stencil_bits(&self) -> i32;

    /// Sample count of the current framebuffer.
    fn sample_count(&self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_es2_rgba8888() {
        let request = ConfigRequest::default();
        assert_eq!(
            (request.red_bits, request.green_bits, request.blue_bits, request.alpha_bits),
            (8, 8, 8, 8)
        );
        assert_eq!(request.depth_bits, 0);
        assert_eq!(request.stencil_bits, 0);
        assert!(request.pbuffer_surfaces);
        assert!(request.window_surfaces);
    }
}
