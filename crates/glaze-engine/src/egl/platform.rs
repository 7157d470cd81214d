use std::ffi::c_void;
use std::sync::OnceLock;

use anyhow::{Context as _, Result, anyhow, ensure};
use glow::HasContext;
use khronos_egl as egl_sys;

use crate::window::NativeWindow;

use super::driver::{ConfigRequest, GlDriver};
use super::handles::{Config, Context, Display, Surface};

type EglInstance = egl_sys::DynamicInstance<egl_sys::EGL1_4>;

/// Driver backed by the system EGL library.
///
/// The library is resolved at runtime (no link-time dependency), so the
/// crate builds and its tests run on hosts without EGL. GL entry points are
/// loaded lazily; callers must have made a context current on the thread
/// before the first GL state query, which the renderer setup order already
/// guarantees.
pub struct EglDriver {
    egl: EglInstance,
    gl: OnceLock<glow::Context>,
}

impl EglDriver {
    /// Loads the system EGL library.
    pub fn load() -> Result<Self> {
        // Safety: loading libEGL has no preconditions beyond the usual
        // dynamic-linker ones.
        let egl = unsafe { EglInstance::load_required() }
            .map_err(|e| anyhow!("failed to load libEGL: {e}"))?;

        Ok(Self {
            egl,
            gl: OnceLock::new(),
        })
    }

    fn gl(&self) -> &glow::Context {
        self.gl.get_or_init(|| {
            // Safety: the loader resolves GL symbols through EGL; a context
            // is current on this thread by the time queries are issued.
            unsafe {
                glow::Context::from_loader_function(|name| {
                    self.egl
                        .get_proc_address(name)
                        .map_or(std::ptr::null(), |f| f as *const c_void)
                })
            }
        })
    }
}

// Handle reconstruction is valid by construction: every raw value stored in
// a handle came out of this driver, and callers check `is_valid` first.

fn display_of(handle: Display) -> egl_sys::Display {
    unsafe { egl_sys::Display::from_ptr(handle.as_raw() as *mut c_void) }
}

fn config_of(handle: Config) -> egl_sys::Config {
    unsafe { egl_sys::Config::from_ptr(handle.as_raw() as *mut c_void) }
}

fn context_of(handle: Context) -> egl_sys::Context {
    unsafe { egl_sys::Context::from_ptr(handle.as_raw() as *mut c_void) }
}

fn surface_of(handle: Surface) -> egl_sys::Surface {
    unsafe { egl_sys::Surface::from_ptr(handle.as_raw() as *mut c_void) }
}

impl GlDriver for EglDriver {
    fn default_display(&self) -> Result<Display> {
        // Safety: requesting the default display has no preconditions; the
        // returned display is validated by `initialize_display` before use.
        let display = unsafe { self.egl.get_display(egl_sys::DEFAULT_DISPLAY) }
            .context("no default EGL display")?;
        Ok(Display::from_raw(display.as_ptr() as usize))
    }

    fn initialize_display(&self, display: Display) -> Result<(i32, i32)> {
        self.egl
            .initialize(display_of(display))
            .map_err(|e| anyhow!("eglInitialize failed: {e}"))
    }

    fn choose_config(&self, display: Display, request: &ConfigRequest) -> Result<Config> {
        let mut surface_mask = 0;
        if request.pbuffer_surfaces {
            surface_mask |= egl_sys::PBUFFER_BIT;
        }
        if request.window_surfaces {
            surface_mask |= egl_sys::WINDOW_BIT;
        }

        let attributes = [
            egl_sys::RENDERABLE_TYPE,
            egl_sys::OPENGL_ES2_BIT,
            egl_sys::SURFACE_TYPE,
            surface_mask,
            egl_sys::RED_SIZE,
            request.red_bits,
            egl_sys::GREEN_SIZE,
            request.green_bits,
            egl_sys::BLUE_SIZE,
            request.blue_bits,
            egl_sys::ALPHA_SIZE,
            request.alpha_bits,
            egl_sys::DEPTH_SIZE,
            request.depth_bits,
            egl_sys::STENCIL_SIZE,
            request.stencil_bits,
            egl_sys::NONE,
        ];

        let config = self
            .egl
            .choose_first_config(display_of(display), &attributes)
            .map_err(|e| anyhow!("eglChooseConfig failed: {e}"))?
            .context("no EGL config matches the requested attributes")?;
        Ok(Config::from_raw(config.as_ptr() as usize))
    }

    fn create_context(
        &self,
        display: Display,
        config: Config,
        client_version: i32,
    ) -> Result<Context> {
        let attributes = [egl_sys::CONTEXT_CLIENT_VERSION, client_version, egl_sys::NONE];

        let context = self
            .egl
            .create_context(display_of(display), config_of(config), None, &attributes)
            .map_err(|e| anyhow!("eglCreateContext failed: {e}"))?;
        Ok(Context::from_raw(context.as_ptr() as usize))
    }

    fn create_pbuffer_surface(
        &self,
        display: Display,
        config: Config,
        width: i32,
        height: i32,
    ) -> Result<Surface> {
        let attributes = [egl_sys::WIDTH, width, egl_sys::HEIGHT, height, egl_sys::NONE];

        let surface = self
            .egl
            .create_pbuffer_surface(display_of(display), config_of(config), &attributes)
            .map_err(|e| anyhow!("eglCreatePbufferSurface failed: {e}"))?;
        Ok(Surface::from_raw(surface.as_ptr() as usize))
    }

    fn create_window_surface(
        &self,
        display: Display,
        config: Config,
        window: &dyn NativeWindow,
    ) -> Result<Surface> {
        let window = window.as_ptr();
        ensure!(!window.is_null(), "native window has a null platform handle");

        // Safety: the pointer is a live platform window whose owner keeps it
        // alive for the lifetime of the renderer holding it.
        let surface = unsafe {
            self.egl
                .create_window_surface(display_of(display), config_of(config), window, None)
        }
        .map_err(|e| anyhow!("eglCreateWindowSurface failed: {e}"))?;
        Ok(Surface::from_raw(surface.as_ptr() as usize))
    }

    fn make_current(&self, display: Display, surface: Surface, context: Context) -> Result<()> {
        let surface = surface_of(surface);
        self.egl
            .make_current(
                display_of(display),
                Some(surface),
                Some(surface),
                Some(context_of(context)),
            )
            .map_err(|e| anyhow!("eglMakeCurrent failed: {e}"))
    }

    fn swap_buffers(&self, display: Display, surface: Surface) -> Result<()> {
        self.egl
            .swap_buffers(display_of(display), surface_of(surface))
            .map_err(|e| anyhow!("eglSwapBuffers failed: {e}"))
    }

    fn destroy_surface(&self, display: Display, surface: Surface) -> Result<()> {
        self.egl
            .destroy_surface(display_of(display), surface_of(surface))
            .map_err(|e| anyhow!("eglDestroySurface failed: {e}"))
    }

    fn set_viewport(&self, width: i32, height: i32) {
        unsafe { self.gl().viewport(0, 0, width, height) }
    }

    fn clear_to_transparent(&self) {
        let gl = self.gl();
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn framebuffer_binding(&self) -> i32 {
        unsafe { self.gl().get_parameter_i32(glow::FRAMEBUFFER_BINDING) }
    }

    fn stencil_bits(&self) -> i32 {
        unsafe { self.gl().get_parameter_i32(glow::STENCIL_BITS) }
    }

    fn sample_count(&self) -> i32 {
        unsafe { self.gl().get_parameter_i32(glow::SAMPLES) }
    }
}
