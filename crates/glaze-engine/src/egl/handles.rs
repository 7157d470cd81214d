//! Opaque platform handle values.
//!
//! Each handle wraps the raw pointer-sized value returned by the platform.
//! Zero is reserved as the "unset" sentinel for every handle kind; a handle
//! is either unset or came from a successful platform call.

/// Connection to a display on which surfaces can be created and presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Display(usize);

impl Display {
    pub const UNSET: Display = Display(0);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Framebuffer configuration chosen for a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config(usize);

impl Config {
    pub const UNSET: Config = Config(0);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Rendering context. Thread-affine: current on at most one thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context(usize);

impl Context {
    pub const UNSET: Context = Context(0);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// On-screen or pixel-buffer GL surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Surface(usize);

impl Surface {
    pub const UNSET: Surface = Surface(0);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}
