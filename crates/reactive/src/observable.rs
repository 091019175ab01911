//! Queued notifications delivered at flush time.
//!
//! This module provides `Observable`, which couples an [`EventStream`] with
//! a handler in a [`DispatchQueue`]. Events passed to `notify` are queued and
//! reach the observers when the host flushes the queue; `notify_sync` skips
//! the queue.

use crate::dispatch::{DispatchQueue, WeakDispatchQueue};
use crate::event_stream::EventStream;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::mem;
use runnel_core::{HandlerId, Lifetime, Producer};

#[cfg(feature = "tracing")]
use tracing::trace;

/// A notifier whose events are delivered by the next dispatch flush.
///
/// # Example
///
/// ```ignore
/// let queue = DispatchQueue::new();
/// let observable = Observable::new(&queue);
/// let _lifetime = observable.subscribe(|event: &u32| println!("{}", event));
///
/// observable.notify(1);
/// observable.notify(2);
/// queue.flush(); // prints 1 then 2
/// ```
pub struct Observable<T> {
    queue: WeakDispatchQueue,
    id: HandlerId,
    queued: Rc<RefCell<VecDeque<T>>>,
    stream: EventStream<T>,
}

impl<T: Clone + 'static> Observable<T> {
    /// Creates an observable whose handler lives in `queue`.
    pub fn new(queue: &DispatchQueue) -> Self {
        let queued: Rc<RefCell<VecDeque<T>>> = Rc::new(RefCell::new(VecDeque::new()));
        let stream = EventStream::new();

        let (pending, target) = (Rc::downgrade(&queued), stream.downgrade());
        let id = queue.register(move || {
            let events = match pending.upgrade() {
                Some(pending) => mem::take(&mut *pending.borrow_mut()),
                None => return,
            };
            #[cfg(feature = "tracing")]
            trace!(count = events.len(), "delivering queued events");
            for event in &events {
                target.fire_copy(event);
            }
        });

        Self {
            queue: queue.downgrade(),
            id,
            queued,
            stream,
        }
    }

    /// Queues `event` and schedules delivery for the next flush.
    ///
    /// Events queued while a delivery runs wait for the following flush.
    /// Without a live, open queue the event is dropped.
    pub fn notify(&self, event: T) {
        let queue = match self.queue.upgrade() {
            Some(queue) if !queue.is_closed() => queue,
            _ => return,
        };
        self.queued.borrow_mut().push_back(event);
        queue.schedule(self.id);
    }

    /// Delivers `event` to the observers right away.
    pub fn notify_sync(&self, event: T) {
        self.stream.fire(event);
    }

    /// Returns a producer of delivered events.
    pub fn events(&self) -> Producer<T> {
        self.stream.events()
    }

    /// Calls `handler` with every delivered event until the returned
    /// lifetime is destroyed.
    pub fn subscribe<F>(&self, handler: F) -> Lifetime
    where
        F: Fn(&T) + 'static,
    {
        self.events().start_with_next(move |event| handler(&event))
    }

    /// Returns the number of events waiting for a flush.
    pub fn queued_len(&self) -> usize {
        self.queued.borrow().len()
    }

    /// Returns the id of this observable's handler in the queue.
    pub fn handler_id(&self) -> HandlerId {
        self.id
    }
}

impl<T> Drop for Observable<T> {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.remove(self.id);
        }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("id", &self.id)
            .field("queued", &self.queued.borrow().len())
            .finish()
    }
}
