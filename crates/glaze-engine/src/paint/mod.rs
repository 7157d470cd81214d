//! Canvas-library seam.
//!
//! The painting library is an external collaborator. The engine only needs a
//! GPU paint context per thread, surfaces wrapped around framebuffer
//! descriptors, and a canvas to hand to draw callbacks — all expressed as
//! object-safe traits the host implements over its canvas library.

mod backend;
mod color;
mod paint;
mod target;

pub use backend::{
    Canvas, ColorSettings, ColorSpace, ColorType, PaintBackend, PaintContext, PaintSurface,
    SurfaceOrigin,
};
pub use color::Color;
pub use paint::Paint;
pub use target::RenderTargetDescriptor;
