//! Current value plus a stream of changes.

use crate::event_stream::{EventStream, WeakStream};
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;
use runnel_core::{Consumer, Lifetime, NoError, Producer};

/// A cached value whose subscribers see it first and every assignment after.
///
/// Two assignment flavours exist: [`set`](Variable::set) always fires, and
/// [`set_if_changed`](Variable::set_if_changed) fires only when the new value
/// differs from the cached one.
pub struct Variable<T> {
    current: Rc<RefCell<T>>,
    changes: EventStream<T>,
}

impl<T: Clone + 'static> Variable<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: Rc::new(RefCell::new(value)),
            changes: EventStream::new(),
        }
    }

    /// Returns a clone of the cached value.
    pub fn current(&self) -> T {
        self.current.borrow().clone()
    }

    /// Calls `f` with a reference to the cached value.
    ///
    /// The value stays borrowed while `f` runs. Use [`current`](Variable::current)
    /// when the callback may assign to this variable.
    ///
    /// # Panics
    ///
    /// Panics if `f` calls `set`, `set_if_changed` or `modify` on this
    /// variable.
    pub fn with_current<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.current.borrow())
    }

    /// Returns a producer that emits the cached value synchronously on
    /// start, followed by every later assignment.
    pub fn value(&self) -> Producer<T> {
        let current: Weak<RefCell<T>> = Rc::downgrade(&self.current);
        let changes = self.changes.downgrade();
        Producer::new(move |consumer: Consumer<T, NoError>| {
            if let Some(current) = current.upgrade() {
                let value = current.borrow().clone();
                consumer.put_next(value);
            }
            changes.attach(consumer)
        })
    }

    /// Returns a producer of later assignments only.
    pub fn changes(&self) -> Producer<T> {
        self.changes.events()
    }

    /// Stores `value` and fires it, even if it equals the cached value.
    pub fn set(&self, value: T) {
        assign(&self.current, &self.changes.downgrade(), value);
    }

    /// Stores and fires `value` only if it differs from the cached value.
    ///
    /// Returns whether the value was assigned.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        if *self.current.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }

    /// Mutates the cached value in place, then fires the result.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        let value = {
            let mut current = self.current.borrow_mut();
            f(&mut current);
            current.clone()
        };
        self.changes.fire(value);
    }

    /// Assigns every value pushed by `producer` to this variable.
    ///
    /// The binding holds no strong reference to the variable and ends with
    /// the returned lifetime, or when `producer` terminates.
    pub fn bind<E: 'static>(&self, producer: Producer<T, E>) -> Lifetime {
        let current = Rc::downgrade(&self.current);
        let changes = self.changes.downgrade();
        producer.start_with_next(move |value| {
            if let Some(current) = current.upgrade() {
                assign(&current, &changes, value);
            }
        })
    }
}

fn assign<T: Clone + 'static>(current: &RefCell<T>, changes: &WeakStream<T, NoError>, value: T) {
    *current.borrow_mut() = value.clone();
    changes.fire_copy(&value);
}

impl<T: Default + Clone + 'static> Default for Variable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("current", &*self.current.borrow())
            .finish()
    }
}
