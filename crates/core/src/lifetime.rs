//! Cleanup scopes for subscriptions.
//!
//! A `Lifetime` owns the release actions of one or more subscriptions. The
//! actions run exactly once: when `destroy()` is called or when the lifetime is
//! dropped, whichever comes first.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::mem;

type ReleaseFn = Box<dyn FnOnce()>;

/// An owner of cleanup actions.
///
/// Actions run in reverse registration order, so state registered first
/// outlives everything registered after it. Merging another lifetime moves
/// its actions in as a single nested action.
///
/// # Example
///
/// ```ignore
/// let mut lifetime = Lifetime::new();
/// lifetime.add(|| println!("released"));
/// drop(lifetime); // prints "released"
/// ```
#[must_use = "dropping a Lifetime runs its release actions immediately"]
#[derive(Default)]
pub struct Lifetime {
    callbacks: Vec<ReleaseFn>,
}

impl Lifetime {
    /// Creates an empty lifetime.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lifetime with a single release action.
    pub fn from_fn<F>(release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callbacks: alloc::vec![Box::new(release) as ReleaseFn],
        }
    }

    /// Returns true if there is nothing to release.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Returns the number of top-level release actions.
    #[inline]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Registers a release action.
    pub fn add<F>(&mut self, release: F)
    where
        F: FnOnce() + 'static,
    {
        self.callbacks.push(Box::new(release));
    }

    /// Takes ownership of another lifetime.
    ///
    /// `other` is released together with `self`, no later.
    pub fn add_lifetime(&mut self, other: Lifetime) {
        if !other.is_empty() {
            self.callbacks.push(Box::new(move || drop(other)));
        }
    }

    /// Allocates state that lives as long as this lifetime.
    ///
    /// The returned handle may be cloned into any number of closures; the
    /// lifetime keeps one reference and drops it on release.
    pub fn make_state<T: 'static>(&mut self, value: T) -> Rc<RefCell<T>> {
        let state = Rc::new(RefCell::new(value));
        let kept = Rc::clone(&state);
        self.add(move || drop(kept));
        state
    }

    /// Runs all release actions now.
    ///
    /// Safe to call repeatedly; only the first call after registration runs
    /// an action.
    pub fn destroy(&mut self) {
        let callbacks = mem::take(&mut self.callbacks);
        for callback in callbacks.into_iter().rev() {
            callback();
        }
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifetime")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
