//! Page Scope
//!
//! Owns everything a page controller registers (listeners, observers, timers,
//! widget state) so `dispose` can tear it all down in one place.

use std::any::Any;

#[derive(Default)]
pub struct Scope {
    resources: Vec<Box<dyn Any>>,
    on_dispose: Vec<Box<dyn FnOnce()>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `resource` alive until dispose
    pub fn hold<T: 'static>(&mut self, resource: T) {
        self.resources.push(Box::new(resource));
    }

    /// Run `f` at dispose, before resources are dropped
    pub fn on_dispose(&mut self, f: impl FnOnce() + 'static) {
        self.on_dispose.push(Box::new(f));
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.on_dispose.is_empty()
    }

    pub fn dispose(&mut self) {
        for f in self.on_dispose.drain(..) {
            f();
        }
        // Newest first, mirroring registration order
        while let Some(resource) = self.resources.pop() {
            drop(resource);
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}
