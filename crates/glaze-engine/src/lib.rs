//! Glaze engine crate.
//!
//! Per-thread GL/EGL surface management for embedding a host-supplied 2D
//! canvas library into platform views: one cached GL context per rendering
//! thread, one drawable surface per view, a small forward-only lifecycle
//! driving setup, drawing, presentation and teardown.

pub mod bindings;
pub mod context;
pub mod egl;
pub mod paint;
pub mod renderer;
pub mod window;

pub mod logging;
