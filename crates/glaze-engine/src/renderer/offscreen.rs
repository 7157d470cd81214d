use std::sync::Arc;

use crate::bindings::{self, SURFACE_BINDING, SurfaceObject};
use crate::egl::GlDriver;
use crate::paint::PaintBackend;

use super::window::{OFFSCREEN_SURFACE_SIZE, WindowRenderer};

/// One-shot renderer that exposes a drawable surface without a window.
///
/// Unlike the per-view path this does not participate in the render
/// lifecycle: it is a synchronous setup, invoked once, whose renderer is
/// discarded after the surface has been taken. It is expected to succeed
/// under correct configuration; violations are programmer errors and abort.
pub struct OffscreenRenderer {
    renderer: WindowRenderer,
}

impl OffscreenRenderer {
    pub fn new(driver: Arc<dyn GlDriver>, backend: Arc<dyn PaintBackend>) -> Self {
        Self {
            renderer: WindowRenderer::new(driver, backend, None),
        }
    }

    /// Builds the thread context and a `width`×`height` drawable surface,
    /// returning it wrapped for the host.
    pub fn make_surface(mut self, width: i32, height: i32) -> Arc<SurfaceObject> {
        self.renderer
            .ensure_initialised()
            .expect("off-screen GPU setup failed");

        let _ = self.renderer.ensure_surface(width, height);
        let surface = self
            .renderer
            .take_surface()
            .expect("off-screen surface was not created");

        Arc::new(SurfaceObject::new(surface))
    }
}

/// Builds the default 100×100 off-screen surface and publishes it under the
/// global `"Surface"` binding for the host's scripting environment.
pub fn make_offscreen_surface(
    driver: Arc<dyn GlDriver>,
    backend: Arc<dyn PaintBackend>,
) -> Arc<SurfaceObject> {
    let (width, height) = OFFSCREEN_SURFACE_SIZE;
    let surface = OffscreenRenderer::new(driver, backend).make_surface(width, height);
    bindings::publish(SURFACE_BINDING, surface.clone());
    surface
}
