//! Per-thread GPU context cache.
//!
//! GL contexts are thread-affine, so every rendering thread gets exactly one
//! lazily-created [`ThreadDrawingContext`] that all renderers on that thread
//! share. Entries live as long as the registry, which is the process.

mod registry;

pub use registry::{GlContextBundle, ThreadContextRegistry, ThreadDrawingContext, registry};
