use std::ffi::c_void;
use std::ptr::NonNull;

use anyhow::{Context as _, Result, bail};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};

/// Exclusive handle to the platform window behind an on-screen surface.
///
/// A renderer owns its window handle for its entire lifetime and drops it
/// exactly once at destruction. Implementors holding a reference-counted
/// platform object (an `ANativeWindow`, typically) release it in `Drop`.
pub trait NativeWindow {
    /// Raw platform window pointer consumed by window-surface creation.
    fn as_ptr(&self) -> *mut c_void;
}

/// [`NativeWindow`] extracted from a `raw-window-handle` provider.
///
/// The provider remains responsible for keeping the underlying window alive
/// while the renderer exists; this type carries no ownership of its own.
pub struct PlatformWindow {
    window: NonNull<c_void>,
}

impl PlatformWindow {
    /// Extracts the platform window pointer from `window`.
    ///
    /// Only window kinds the GL platform layer can consume directly are
    /// accepted.
    pub fn from_window(window: &impl HasWindowHandle) -> Result<Self> {
        let handle = window
            .window_handle()
            .context("window handle unavailable")?
            .as_raw();

        match handle {
            RawWindowHandle::AndroidNdk(handle) => Ok(Self {
                window: handle.a_native_window,
            }),
            other => bail!("unsupported window handle kind: {other:?}"),
        }
    }
}

impl NativeWindow for PlatformWindow {
    fn as_ptr(&self) -> *mut c_void {
        self.window.as_ptr()
    }
}
