//! In-memory driver and paint backend for renderer tests.
//!
//! Both fakes count the platform calls the real implementations would make
//! and can be told to fail individual steps, so tests can drive the frame
//! lifecycle without a GPU.

use std::any::Any;
use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};

use crate::egl::{Config, ConfigRequest, Context, Display, GlDriver, Surface};
use crate::paint::{
    Canvas, ColorType, Paint, PaintBackend, PaintContext, PaintSurface, RenderTargetDescriptor,
    SurfaceOrigin,
};
use crate::window::NativeWindow;

#[derive(Default)]
pub(crate) struct DriverStats {
    pub surfaces_created: AtomicUsize,
    pub window_surfaces_created: AtomicUsize,
    pub surfaces_destroyed: AtomicUsize,
    pub swaps: AtomicUsize,
    pub clears: AtomicUsize,
    pub viewports: Mutex<Vec<(i32, i32)>>,
    pub pbuffer_sizes: Mutex<Vec<(i32, i32)>>,
}

pub(crate) struct FakeDriver {
    pub stats: Arc<DriverStats>,
    pub fail_choose_config: AtomicBool,
    pub fail_swap: AtomicBool,
    /// Value reported by the GL sample-count query.
    pub samples: AtomicI32,
    pub stencil: AtomicI32,
    pub framebuffer: AtomicI32,
    next_surface: AtomicUsize,
}

impl FakeDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            stats: Arc::new(DriverStats::default()),
            fail_choose_config: AtomicBool::new(false),
            fail_swap: AtomicBool::new(false),
            samples: AtomicI32::new(0),
            stencil: AtomicI32::new(8),
            framebuffer: AtomicI32::new(0),
            next_surface: AtomicUsize::new(1),
        })
    }

    fn allocate_surface(&self) -> Surface {
        Surface::from_raw(0x1000 + self.next_surface.fetch_add(1, Ordering::Relaxed))
    }
}

impl GlDriver for FakeDriver {
    fn default_display(&self) -> Result<Display> {
        Ok(Display::from_raw(0x10))
    }

    fn initialize_display(&self, _display: Display) -> Result<(i32, i32)> {
        Ok((1, 4))
    }

    fn choose_config(&self, _display: Display, _request: &ConfigRequest) -> Result<Config> {
        if self.fail_choose_config.load(Ordering::Relaxed) {
            bail!("no matching config");
        }
        Ok(Config::from_raw(0x20))
    }

    fn create_context(
        &self,
        _display: Display,
        _config: Config,
        _client_version: i32,
    ) -> Result<Context> {
        Ok(Context::from_raw(0x30))
    }

    fn create_pbuffer_surface(
        &self,
        _display: Display,
        _config: Config,
        width: i32,
        height: i32,
    ) -> Result<Surface> {
        self.stats.surfaces_created.fetch_add(1, Ordering::Relaxed);
        self.stats.pbuffer_sizes.lock().unwrap().push((width, height));
        Ok(self.allocate_surface())
    }

    fn create_window_surface(
        &self,
        _display: Display,
        _config: Config,
        _window: &dyn NativeWindow,
    ) -> Result<Surface> {
        self.stats.surfaces_created.fetch_add(1, Ordering::Relaxed);
        self.stats
            .window_surfaces_created
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.allocate_surface())
    }

    fn make_current(&self, _display: Display, _surface: Surface, _context: Context) -> Result<()> {
        Ok(())
    }

    fn swap_buffers(&self, _display: Display, _surface: Surface) -> Result<()> {
        self.stats.swaps.fetch_add(1, Ordering::Relaxed);
        if self.fail_swap.load(Ordering::Relaxed) {
            bail!("swap rejected");
        }
        Ok(())
    }

    fn destroy_surface(&self, _display: Display, _surface: Surface) -> Result<()> {
        self.stats.surfaces_destroyed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn set_viewport(&self, width: i32, height: i32) {
        self.stats.viewports.lock().unwrap().push((width, height));
    }

    fn clear_to_transparent(&self) {
        self.stats.clears.fetch_add(1, Ordering::Relaxed);
    }

    fn framebuffer_binding(&self) -> i32 {
        self.framebuffer.load(Ordering::Relaxed)
    }

    fn stencil_bits(&self) -> i32 {
        self.stencil.load(Ordering::Relaxed)
    }

    fn sample_count(&self) -> i32 {
        self.samples.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
pub(crate) struct PaintStats {
    pub contexts_created: AtomicUsize,
    pub resets: AtomicUsize,
    pub surfaces_built: AtomicUsize,
    pub flushes: AtomicUsize,
    pub last_descriptor: Mutex<Option<RenderTargetDescriptor>>,
    pub circles: Mutex<Vec<(f32, f32, f32)>>,
}

pub(crate) struct FakePaintBackend {
    pub stats: Arc<PaintStats>,
    pub fail_context: AtomicBool,
    pub fail_surface: Arc<AtomicBool>,
    max_samples: i32,
}

impl FakePaintBackend {
    pub fn new() -> Arc<Self> {
        Self::with_max_samples(4)
    }

    pub fn with_max_samples(max_samples: i32) -> Arc<Self> {
        Arc::new(Self {
            stats: Arc::new(PaintStats::default()),
            fail_context: AtomicBool::new(false),
            fail_surface: Arc::new(AtomicBool::new(false)),
            max_samples,
        })
    }

    /// Builds a context directly, for tests that bypass the renderer.
    pub fn make_paint_context(&self) -> Box<dyn PaintContext> {
        self.make_context().expect("fake context creation enabled")
    }
}

impl PaintBackend for FakePaintBackend {
    fn make_context(&self) -> Option<Box<dyn PaintContext>> {
        if self.fail_context.load(Ordering::Relaxed) {
            return None;
        }
        self.stats.contexts_created.fetch_add(1, Ordering::Relaxed);
        Some(Box::new(FakePaintContext {
            stats: self.stats.clone(),
            fail_surface: self.fail_surface.clone(),
            max_samples: self.max_samples,
        }))
    }
}

struct FakePaintContext {
    stats: Arc<PaintStats>,
    fail_surface: Arc<AtomicBool>,
    max_samples: i32,
}

impl PaintContext for FakePaintContext {
    fn reset_state(&mut self) {
        self.stats.resets.fetch_add(1, Ordering::Relaxed);
    }

    fn max_sample_count(&self, _color_type: ColorType) -> i32 {
        self.max_samples
    }

    fn wrap_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
        _origin: SurfaceOrigin,
        _color_type: ColorType,
    ) -> Option<Box<dyn PaintSurface>> {
        if self.fail_surface.load(Ordering::Relaxed) {
            return None;
        }
        self.stats.surfaces_built.fetch_add(1, Ordering::Relaxed);
        *self.stats.last_descriptor.lock().unwrap() = Some(*descriptor);
        Some(Box::new(FakeSurface {
            descriptor: *descriptor,
            stats: self.stats.clone(),
        }))
    }
}

pub(crate) struct FakeSurface {
    descriptor: RenderTargetDescriptor,
    stats: Arc<PaintStats>,
}

impl PaintSurface for FakeSurface {
    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }

    fn flush_and_submit(&mut self) {
        self.stats.flushes.fetch_add(1, Ordering::Relaxed);
    }

    fn width(&self) -> i32 {
        self.descriptor.width
    }

    fn height(&self) -> i32 {
        self.descriptor.height
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Canvas for FakeSurface {
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, _paint: &Paint) {
        self.stats.circles.lock().unwrap().push((cx, cy, radius));
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) struct FakeWindow;

impl NativeWindow for FakeWindow {
    fn as_ptr(&self) -> *mut c_void {
        0x5432 as *mut c_void
    }
}
