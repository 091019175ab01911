//! The sink side of a subscription.
//!
//! A `Consumer` receives values through `put_next`, and at most one terminal
//! signal through `put_error` or `put_done`. Clones share the same state, so a
//! producer can hand copies to every closure that needs to push.

use crate::error::{Error, Result};
use crate::lifetime::Lifetime;
use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::mem;

#[cfg(feature = "tracing")]
use tracing::trace;

struct Handlers<T, E> {
    next: Box<dyn Fn(T)>,
    error: Box<dyn Fn(E)>,
    done: Box<dyn Fn()>,
}

struct ConsumerState<T, E> {
    /// `None` once the consumer is terminated.
    handlers: Option<Rc<Handlers<T, E>>>,
    lifetime: Lifetime,
}

/// A reference-counted sink for values of type `T` and errors of type `E`.
///
/// Handlers are `Fn` rather than `FnMut` so a push may re-enter the same
/// consumer from inside a handler; keep mutable state in a `Cell` or
/// `RefCell`, or in [`Consumer::make_state`].
///
/// # Invariants
///
/// 1. After `put_error` or `put_done` no handler is ever called again.
/// 2. Termination destroys the consumer's lifetime exactly once.
/// 3. Anything added after termination is released immediately.
pub struct Consumer<T, E> {
    inner: Rc<RefCell<ConsumerState<T, E>>>,
}

impl<T, E> Clone for Consumer<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Consumer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("terminated", &self.is_terminated())
            .finish()
    }
}

impl<T, E> Consumer<T, E> {
    /// Creates a consumer from its three handlers.
    pub fn new<N, R, D>(on_next: N, on_error: R, on_done: D) -> Self
    where
        N: Fn(T) + 'static,
        R: Fn(E) + 'static,
        D: Fn() + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(ConsumerState {
                handlers: Some(Rc::new(Handlers {
                    next: Box::new(on_next),
                    error: Box::new(on_error),
                    done: Box::new(on_done),
                })),
                lifetime: Lifetime::new(),
            })),
        }
    }

    fn handlers(&self) -> Option<Rc<Handlers<T, E>>> {
        self.inner.borrow().handlers.clone()
    }

    /// Pushes a value.
    ///
    /// Returns false if the consumer is already terminated; the value is
    /// dropped in that case.
    pub fn put_next(&self, value: T) -> bool {
        match self.handlers() {
            Some(handlers) => {
                (handlers.next)(value);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                trace!("put_next on a terminated consumer ignored");
                false
            }
        }
    }

    /// Pushes a clone of `value`.
    pub fn put_next_copy(&self, value: &T) -> bool
    where
        T: Clone,
    {
        match self.handlers() {
            Some(handlers) => {
                (handlers.next)(value.clone());
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                trace!("put_next_copy on a terminated consumer ignored");
                false
            }
        }
    }

    /// Pushes a value, reporting termination as an error.
    pub fn try_put_next(&self, value: T) -> Result<()> {
        if self.put_next(value) {
            Ok(())
        } else {
            Err(Error::Terminated)
        }
    }

    /// Delivers an error and terminates.
    pub fn put_error(&self, error: E) {
        let handlers = self.inner.borrow_mut().handlers.take();
        match handlers {
            Some(handlers) => {
                (handlers.error)(error);
                drop(handlers);
                self.release();
            }
            None => {
                #[cfg(feature = "tracing")]
                trace!("put_error on a terminated consumer ignored");
            }
        }
    }

    /// Signals completion and terminates.
    pub fn put_done(&self) {
        let handlers = self.inner.borrow_mut().handlers.take();
        match handlers {
            Some(handlers) => {
                (handlers.done)();
                drop(handlers);
                self.release();
            }
            None => {
                #[cfg(feature = "tracing")]
                trace!("put_done on a terminated consumer ignored");
            }
        }
    }

    /// Terminates without delivering a terminal signal.
    pub fn terminate(&self) {
        let handlers = self.inner.borrow_mut().handlers.take();
        if handlers.is_some() {
            drop(handlers);
            self.release();
        }
    }

    /// Returns a lifetime that terminates this consumer when destroyed.
    ///
    /// Operators add the terminator of their upstream consumer to the
    /// downstream one before starting the upstream producer, so ending the
    /// downstream subscription stops a source that is still pushing
    /// synchronously.
    pub fn terminator(&self) -> Lifetime
    where
        T: 'static,
        E: 'static,
    {
        let consumer = self.clone();
        Lifetime::from_fn(move || consumer.terminate())
    }

    fn release(&self) {
        let mut lifetime = mem::take(&mut self.inner.borrow_mut().lifetime);
        lifetime.destroy();
    }

    /// Returns true once the consumer received a terminal signal or was
    /// terminated.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.inner.borrow().handlers.is_none()
    }

    /// Ties `lifetime` to this consumer.
    ///
    /// Returns false, after destroying `lifetime`, if the consumer is already
    /// terminated.
    pub fn add_lifetime(&self, lifetime: Lifetime) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.handlers.is_none() {
            drop(state);
            drop(lifetime);
            return false;
        }
        state.lifetime.add_lifetime(lifetime);
        true
    }

    /// Registers a release action on this consumer.
    pub fn add_release<F>(&self, release: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        self.add_lifetime(Lifetime::from_fn(release))
    }

    /// Allocates subscription-scoped state.
    ///
    /// The consumer holds one reference until it terminates. Closures that
    /// capture the handle keep the state alive only as long as they live.
    pub fn make_state<S: 'static>(&self, value: S) -> Rc<RefCell<S>> {
        let state = Rc::new(RefCell::new(value));
        let kept = Rc::clone(&state);
        self.add_release(move || drop(kept));
        state
    }

    /// Returns true if both handles refer to the same consumer.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
