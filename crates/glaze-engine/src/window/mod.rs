//! Native window ownership.

mod native;

pub use native::{NativeWindow, PlatformWindow};
