//! Multicast event streams.
//!
//! An `EventStream` owns the set of consumers currently subscribed through
//! its `events()` producers and pushes every fired value to all of them.

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::mem;
use runnel_core::{Consumer, Lifetime, NoError, Producer};

#[cfg(feature = "tracing")]
use tracing::trace;

/// Subscription key inside one stream. Keys grow monotonically, so map order
/// is subscription order.
type SubscriptionKey = u64;

struct StreamState<T, E> {
    consumers: BTreeMap<SubscriptionKey, Consumer<T, E>>,
    next_key: SubscriptionKey,
}

/// A hand-fired source of values with a live set of consumers.
///
/// Firing iterates a snapshot of the consumers, so handlers may subscribe,
/// unsubscribe or fire again while a fire is in progress. Consumers added
/// during a fire only see later fires; consumers removed during a fire are
/// skipped if they have not been reached yet.
///
/// Dropping the stream completes every remaining consumer.
///
/// # Example
///
/// ```ignore
/// let stream = EventStream::<i32>::new();
/// let _lifetime = stream.events().start_with_next(|v| println!("{}", v));
/// stream.fire(7);
/// ```
pub struct EventStream<T, E = NoError> {
    state: Rc<RefCell<StreamState<T, E>>>,
}

impl<T: 'static, E: 'static> Default for EventStream<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for EventStream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("consumers", &self.state.borrow().consumers.len())
            .finish()
    }
}

impl<T: 'static, E: 'static> EventStream<T, E> {
    /// Creates a stream without consumers.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StreamState {
                consumers: BTreeMap::new(),
                next_key: 0,
            })),
        }
    }

    /// Returns a producer of the values fired from now on.
    ///
    /// Starting it after the stream was dropped completes immediately.
    pub fn events(&self) -> Producer<T, E> {
        self.downgrade().producer()
    }

    /// Returns a producer that first emits a clone of `value`, then the
    /// values fired from now on.
    pub fn events_starting_with(&self, value: T) -> Producer<T, E>
    where
        T: Clone,
    {
        let stream = self.downgrade();
        Producer::new(move |consumer: Consumer<T, E>| {
            consumer.put_next_copy(&value);
            stream.attach(consumer)
        })
    }

    /// Pushes `value` to every current consumer.
    pub fn fire(&self, value: T)
    where
        T: Clone,
    {
        fire_copy(&self.state, &value);
    }

    /// Pushes a clone of `value` to every current consumer.
    pub fn fire_copy(&self, value: &T)
    where
        T: Clone,
    {
        fire_copy(&self.state, value);
    }

    /// Delivers `error` to every current consumer, terminating them.
    pub fn fire_error(&self, error: E)
    where
        E: Clone,
    {
        fire_error(&self.state, error);
    }

    /// Completes every current consumer.
    ///
    /// The stream stays usable; later subscribers see later fires.
    pub fn fire_done(&self) {
        fire_done(&self.state);
    }

    /// Returns true if at least one live consumer is subscribed.
    pub fn has_consumers(&self) -> bool {
        self.state
            .borrow()
            .consumers
            .values()
            .any(|consumer| !consumer.is_terminated())
    }

    /// Returns the number of live consumers.
    pub fn consumer_count(&self) -> usize {
        self.state
            .borrow()
            .consumers
            .values()
            .filter(|consumer| !consumer.is_terminated())
            .count()
    }

    pub(crate) fn downgrade(&self) -> WeakStream<T, E> {
        WeakStream {
            state: Rc::downgrade(&self.state),
        }
    }
}

impl<T, E> Drop for EventStream<T, E> {
    fn drop(&mut self) {
        fire_done(&self.state);
    }
}

/// A non-owning handle used by producers and bindings that must not keep
/// the stream alive.
pub(crate) struct WeakStream<T, E> {
    state: Weak<RefCell<StreamState<T, E>>>,
}

impl<T, E> Clone for WeakStream<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<T: 'static, E: 'static> WeakStream<T, E> {
    /// Adds `consumer` to the stream, unless it is already terminated.
    pub(crate) fn attach(&self, consumer: Consumer<T, E>) -> Lifetime {
        if consumer.is_terminated() {
            return Lifetime::new();
        }
        let state = match self.state.upgrade() {
            Some(state) => state,
            None => {
                consumer.put_done();
                return Lifetime::new();
            }
        };

        let key = {
            let mut state = state.borrow_mut();
            let key = state.next_key;
            state.next_key += 1;
            state.consumers.insert(key, consumer);
            key
        };
        #[cfg(feature = "tracing")]
        trace!(key, "event stream subscription added");

        let weak = Rc::downgrade(&state);
        Lifetime::from_fn(move || {
            if let Some(state) = weak.upgrade() {
                let removed = state.borrow_mut().consumers.remove(&key);
                drop(removed);
            }
        })
    }

    pub(crate) fn producer(&self) -> Producer<T, E> {
        let stream = self.clone();
        Producer::new(move |consumer: Consumer<T, E>| stream.attach(consumer))
    }

    pub(crate) fn fire_copy(&self, value: &T)
    where
        T: Clone,
    {
        if let Some(state) = self.state.upgrade() {
            fire_copy(&state, value);
        }
    }

    pub(crate) fn fire_error(&self, error: E)
    where
        E: Clone,
    {
        if let Some(state) = self.state.upgrade() {
            fire_error(&state, error);
        }
    }

    pub(crate) fn fire_done(&self) {
        if let Some(state) = self.state.upgrade() {
            fire_done(&state);
        }
    }
}

fn snapshot<T, E>(state: &RefCell<StreamState<T, E>>) -> Vec<Consumer<T, E>> {
    state.borrow().consumers.values().cloned().collect()
}

fn fire_copy<T: Clone, E>(state: &RefCell<StreamState<T, E>>, value: &T) {
    let consumers = snapshot(state);
    let mut stale = false;
    for consumer in &consumers {
        if !consumer.put_next_copy(value) {
            stale = true;
        }
    }
    if stale {
        state
            .borrow_mut()
            .consumers
            .retain(|_, consumer| !consumer.is_terminated());
    }
}

fn fire_error<T, E: Clone>(state: &RefCell<StreamState<T, E>>, error: E) {
    let consumers = mem::take(&mut state.borrow_mut().consumers);
    for consumer in consumers.values() {
        consumer.put_error(error.clone());
    }
}

fn fire_done<T, E>(state: &RefCell<StreamState<T, E>>) {
    let consumers = mem::take(&mut state.borrow_mut().consumers);
    for consumer in consumers.values() {
        consumer.put_done();
    }
}

/// Starts `producer` and forwards everything it pushes into `stream`.
///
/// The subscription is tied to `lifetime`; it does not keep the stream alive.
pub fn start_to_stream<T, E>(producer: Producer<T, E>, stream: &EventStream<T, E>, lifetime: &mut Lifetime)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (on_next, on_error, on_done) = (stream.downgrade(), stream.downgrade(), stream.downgrade());
    producer.start_into(
        move |value| on_next.fire_copy(&value),
        move |error| on_error.fire_error(error),
        move || on_done.fire_done(),
        lifetime,
    );
}
