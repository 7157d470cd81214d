//! Platform GL/EGL layer.
//!
//! [`GlDriver`] is the seam between the renderers and the platform: opaque
//! handle types, the framebuffer configuration request, and the production
//! EGL-backed implementation live here. Tests substitute an in-memory driver.

mod driver;
mod handles;
mod platform;

pub use driver::{ConfigRequest, GlDriver};
pub use handles::{Config, Context, Display, Surface};
pub use platform::EglDriver;
