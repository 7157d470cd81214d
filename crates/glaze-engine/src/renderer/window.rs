use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::context::{GlContextBundle, registry};
use crate::egl::{self, ConfigRequest, GlDriver};
use crate::paint::{
    Canvas, ColorSettings, Paint, PaintBackend, PaintSurface, RenderTargetDescriptor,
    SurfaceOrigin,
};
use crate::window::NativeWindow;

use super::state::RenderState;

/// Size of the off-screen pixel-buffer surface used when no window is bound.
pub const OFFSCREEN_SURFACE_SIZE: (i32, i32) = (100, 100);

/// Construction parameters for a renderer.
///
/// Keep this structure stable and minimal; the defaults reproduce the
/// standard embedding configuration.
#[derive(Debug, Clone)]
pub struct RendererInit {
    /// Framebuffer configuration requested from the platform.
    pub config: ConfigRequest,

    /// ES client version requested for the rendering context.
    pub client_version: i32,

    /// Dimensions of the pixel-buffer surface used without a native window.
    pub offscreen_size: (i32, i32),
}

impl Default for RendererInit {
    fn default() -> Self {
        Self {
            config: ConfigRequest::default(),
            client_version: 2,
            offscreen_size: OFFSCREEN_SURFACE_SIZE,
        }
    }
}

/// Per-view renderer driving the surface lifecycle.
///
/// One instance per view. All instances on a thread share that thread's
/// cached GL context; each instance owns its own GL surface, drawable
/// surface and lifecycle state. Frames must be driven sequentially — the
/// lifecycle assumes no concurrent re-entry, which the host's
/// one-producer-thread-per-view model guarantees.
pub struct WindowRenderer {
    driver: Arc<dyn GlDriver>,
    backend: Arc<dyn PaintBackend>,
    init: RendererInit,

    /// Present for on-screen rendering; absent for the pixel-buffer path.
    /// Dropped exactly once with the renderer.
    native_window: Option<Box<dyn NativeWindow>>,

    gl_surface: Option<egl::Surface>,
    surface: Option<Box<dyn PaintSurface>>,
    target: Option<RenderTargetDescriptor>,
    last_size: Option<(i32, i32)>,

    state: RenderState,
}

impl WindowRenderer {
    /// Creates a renderer bound to `native_window`, or an off-screen one
    /// when no window is given.
    pub fn new(
        driver: Arc<dyn GlDriver>,
        backend: Arc<dyn PaintBackend>,
        native_window: Option<Box<dyn NativeWindow>>,
    ) -> Self {
        Self::with_init(driver, backend, native_window, RendererInit::default())
    }

    pub fn with_init(
        driver: Arc<dyn GlDriver>,
        backend: Arc<dyn PaintBackend>,
        native_window: Option<Box<dyn NativeWindow>>,
        init: RendererInit,
    ) -> Self {
        Self {
            driver,
            backend,
            init,
            native_window,
            gl_surface: None,
            surface: None,
            target: None,
            last_size: None,
            state: RenderState::Initializing,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Dimensions of the last built surface.
    pub fn surface_size(&self) -> Option<(i32, i32)> {
        self.last_size
    }

    /// Takes ownership of the current drawable surface, if any.
    pub fn take_surface(&mut self) -> Option<Box<dyn PaintSurface>> {
        self.surface.take()
    }

    /// Requests teardown; the next [`run`](Self::run) releases the surface.
    pub fn teardown(&mut self) {
        self.state = self.state.request_finish();
    }

    /// Drives one lifecycle step for this view.
    ///
    /// While rendering: ensures the thread context and a `width`×`height`
    /// surface exist, then draws through `callback`, flushes and presents.
    /// A frame whose context or surface is not ready yet is skipped and
    /// retried on the next call. After teardown the first call releases the
    /// surface; any further calls are no-ops.
    pub fn run(
        &mut self,
        callback: Option<&mut dyn FnMut(&mut dyn Canvas)>,
        width: i32,
        height: i32,
    ) {
        if self.state == RenderState::Initializing {
            // Nothing happens between construction and the first frame, so
            // the first drive goes straight to rendering.
            self.state = self.state.advance();
        }

        match self.state {
            RenderState::Rendering => self.render_frame(callback, width, height),
            RenderState::Finishing => {
                self.release_surface();
                self.state = self.state.advance();
            }
            RenderState::Initializing | RenderState::Done => {}
        }
    }

    fn render_frame(
        &mut self,
        callback: Option<&mut dyn FnMut(&mut dyn Canvas)>,
        width: i32,
        height: i32,
    ) {
        if let Err(e) = self.ensure_initialised() {
            log::debug!("skipping frame, context not ready: {e:#}");
            return;
        }

        if let Err(e) = self.ensure_surface(width, height) {
            log::debug!("skipping frame, surface not ready: {e:#}");
            return;
        }

        let Some(callback) = callback else { return };

        // Sibling surfaces on this thread share the paint context and leave
        // GL state behind; drop those assumptions before drawing.
        registry().with_current(|ctx| {
            if let Some(paint) = ctx.paint.as_mut() {
                paint.reset_state();
            }
        });

        self.driver.clear_to_transparent();

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        callback(surface.canvas());
        surface.flush_and_submit();

        self.present();
    }

    /// Diagnostic draw-and-present: paints a fixed circle on the current
    /// surface and swaps it onto the display. For smoke-testing a freshly
    /// wired view; a missing surface is logged, not fatal.
    pub fn finish(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            log::warn!("finish called without a drawable surface");
            return;
        };

        let paint = Paint::default();
        surface.canvas().draw_circle(100.0, 100.0, 100.0, &paint);
        surface.flush_and_submit();

        self.present();
    }

    /// Idempotent context/surface/paint setup, stopping at the first
    /// failure. Failures are retryable: nothing already cached is touched.
    pub(crate) fn ensure_initialised(&mut self) -> Result<()> {
        self.init_thread_gl_context()?;
        self.init_gl_surface()?;
        self.init_paint_context()?;
        Ok(())
    }

    /// Step 1: the thread's shared display/config/context bundle.
    ///
    /// Handles are staged locally and committed together, so a failure at
    /// any point leaves the cache unset.
    fn init_thread_gl_context(&self) -> Result<()> {
        registry().with_current(|ctx| {
            if ctx.gl.is_some() {
                return Ok(());
            }

            let display = self.driver.default_display()?;
            let (major, minor) = self.driver.initialize_display(display)?;
            log::debug!("display initialized, version {major}.{minor}");

            let config = self.driver.choose_config(display, &self.init.config)?;
            let context = self
                .driver
                .create_context(display, config, self.init.client_version)?;

            ctx.gl = Some(GlContextBundle {
                display,
                config,
                context,
            });
            Ok(())
        })
    }

    /// Step 2: this view's GL surface, made current on the thread.
    ///
    /// Without a native window the surface is a fixed-size pixel buffer;
    /// with one it is window-backed.
    fn init_gl_surface(&mut self) -> Result<()> {
        let gl = registry()
            .with_current(|ctx| ctx.gl)
            .context("thread GL context is unset")?;

        if let Some(surface) = self.gl_surface {
            return self.driver.make_current(gl.display, surface, gl.context);
        }

        let surface = match self.native_window.as_deref() {
            Some(window) => self
                .driver
                .create_window_surface(gl.display, gl.config, window)?,
            None => {
                let (width, height) = self.init.offscreen_size;
                self.driver
                    .create_pbuffer_surface(gl.display, gl.config, width, height)?
            }
        };

        self.gl_surface = Some(surface);
        self.driver.make_current(gl.display, surface, gl.context)
    }

    /// Step 3: the thread's paint context.
    fn init_paint_context(&self) -> Result<()> {
        registry().with_current(|ctx| {
            if ctx.paint.is_some() {
                return Ok(());
            }

            let paint = self
                .backend
                .make_context()
                .context("paint backend could not create a GPU context")?;
            ctx.paint = Some(paint);
            Ok(())
        })
    }

    /// Ensures a drawable surface matching `width`×`height` exists.
    ///
    /// Rebuilds only when no surface exists, the descriptor went invalid,
    /// or the requested size changed; otherwise succeeds immediately. The
    /// rebuilt surface wraps whatever framebuffer is bound on this thread,
    /// with the sample count clamped to the paint backend's maximum for the
    /// 8-bit RGBA color type.
    pub(crate) fn ensure_surface(&mut self, width: i32, height: i32) -> Result<()> {
        registry().with_current(|ctx| {
            let paint = ctx.paint.as_mut().context("paint context is unset")?;

            let needs_rebuild = self.surface.is_none()
                || !self.target.is_some_and(|t| t.is_valid())
                || self.last_size != Some((width, height));
            if !needs_rebuild {
                return Ok(());
            }

            self.driver.set_viewport(width, height);
            self.last_size = Some((width, height));

            let framebuffer = self.driver.framebuffer_binding();
            let stencil_bits = self.driver.stencil_bits();
            let samples = self.driver.sample_count();

            let settings = ColorSettings::for_space(None);
            let sample_count = samples.min(paint.max_sample_count(settings.color_type));

            let descriptor = RenderTargetDescriptor {
                width,
                height,
                sample_count,
                stencil_bits,
                framebuffer: framebuffer as u32,
                format: settings.pixel_format,
            };

            let Some(surface) =
                paint.wrap_render_target(&descriptor, SurfaceOrigin::BottomLeft, settings.color_type)
            else {
                log::error!("drawable surface could not be created for {width}x{height}");
                anyhow::bail!("drawable surface creation failed");
            };

            self.target = Some(descriptor);
            self.surface = Some(surface);
            Ok(())
        })
    }

    /// Swaps the drawn frame onto the display. Failure is logged; the frame
    /// is already flushed, so it counts as drawn either way.
    fn present(&self) {
        let display = registry().with_current(|ctx| ctx.gl.map(|gl| gl.display));
        let (Some(display), Some(gl_surface)) = (display, self.gl_surface) else {
            return;
        };

        if let Err(e) = self.driver.swap_buffers(display, gl_surface) {
            log::warn!("buffer swap failed: {e:#}");
        }
    }

    /// Releases this view's GL surface and drawable surface.
    ///
    /// The thread's shared context stays alive for other views on the same
    /// thread. Reached exactly once: only the Finishing state calls it, and
    /// Finishing advances straight to Done.
    fn release_surface(&mut self) {
        let display = registry().with_current(|ctx| ctx.gl.map(|gl| gl.display));

        if let (Some(display), Some(surface)) = (display, self.gl_surface) {
            if let Err(e) = self.driver.destroy_surface(display, surface) {
                log::warn!("failed to destroy GL surface: {e:#}");
            }
        }

        self.gl_surface = None;
        self.surface = None;
    }
}
