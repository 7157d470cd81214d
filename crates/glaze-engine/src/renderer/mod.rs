//! Render lifecycle: the per-view frame drive and the off-screen one-shot.

mod offscreen;
mod state;
mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use offscreen::{OffscreenRenderer, make_offscreen_surface};
pub use state::RenderState;
pub use window::{OFFSCREEN_SURFACE_SIZE, RendererInit, WindowRenderer};
