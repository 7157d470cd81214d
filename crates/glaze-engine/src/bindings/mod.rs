//! Host scripting bindings.
//!
//! The engine publishes a small number of objects into a global,
//! name-addressed table that the host's scripting layer mirrors into its
//! global scope. Publication replaces any previous value under the name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use state::InitCell;

use crate::paint::PaintSurface;

/// Binding name under which the off-screen surface is published.
pub const SURFACE_BINDING: &str = "Surface";

/// Host-exposed wrapper around a drawable surface.
///
/// Dimensions are captured at wrap time; the surface itself is reachable
/// only through [`with_surface`](Self::with_surface) so scripting-side and
/// render-side access cannot overlap.
pub struct SurfaceObject {
    width: i32,
    height: i32,
    surface: Mutex<Box<dyn PaintSurface>>,
}

impl SurfaceObject {
    pub fn new(surface: Box<dyn PaintSurface>) -> Self {
        let (width, height) = (surface.width(), surface.height());
        Self {
            width,
            height,
            surface: Mutex::new(surface),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Runs `f` with exclusive access to the wrapped surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn PaintSurface) -> R) -> R {
        let mut guard = lock(&self.surface);
        f(guard.as_mut())
    }
}

struct BindingTable {
    entries: Mutex<HashMap<String, Arc<SurfaceObject>>>,
}

static BINDINGS: InitCell<BindingTable> = InitCell::new();

fn table() -> &'static BindingTable {
    if BINDINGS.try_get().is_none() {
        let _ = BINDINGS.set(BindingTable {
            entries: Mutex::new(HashMap::new()),
        });
    }
    BINDINGS.get()
}

/// Publishes `object` under `name`, replacing any previous binding.
pub fn publish(name: &str, object: Arc<SurfaceObject>) {
    lock(&table().entries).insert(name.to_owned(), object);
}

/// Looks up a published binding.
pub fn get(name: &str) -> Option<Arc<SurfaceObject>> {
    lock(&table().entries).get(name).cloned()
}

/// Poison-tolerant lock; scripting access keeps working after a panic on
/// the render side.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
