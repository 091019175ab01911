//! Deferred dispatch queue.
//!
//! This module provides `DispatchQueue`, a registry of handler groups that
//! are scheduled now and invoked later, when the host event loop flushes the
//! queue. A handler is in at most one of two sets:
//!
//! - pending: scheduled, waiting for the next flush
//! - active: being invoked by the flush in progress
//!
//! The host wires the queue with two calls: a flush requester (called when
//! the first handler becomes pending after a flush) and [`DispatchQueue::flush`].

use alloc::collections::BTreeSet;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;
use core::mem;
use hashbrown::HashMap;
use runnel_core::{Error, HandlerId, Result};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Handler invoked at flush time.
pub type Handler = Rc<dyn Fn()>;

/// Where a registered handler currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerState {
    /// Registered (or unknown) and not scheduled.
    Unregistered,
    /// Scheduled for the next flush.
    Pending,
    /// Due in the flush in progress.
    Active,
}

struct QueueState {
    handlers: HashMap<HandlerId, Handler>,
    pending: BTreeSet<HandlerId>,
    active: BTreeSet<HandlerId>,
    next_id: HandlerId,
    /// Set once a flush was requested and cleared by the next flush.
    flush_requested: bool,
    flushing: bool,
    closed: bool,
    request_flush: Option<Handler>,
}

/// An explicitly owned deferred-dispatch queue.
///
/// Clones share the same queue. Handlers run in registration order within
/// one flush. Once [`shutdown`](DispatchQueue::shutdown) is called every
/// operation is a silent no-op; [`try_schedule`](DispatchQueue::try_schedule)
/// reports that state as an error instead.
///
/// # Example
///
/// ```ignore
/// let queue = DispatchQueue::new();
/// let id = queue.register(|| println!("flushed"));
/// queue.schedule(id);
/// assert_eq!(queue.flush(), 1);
/// ```
#[derive(Clone)]
pub struct DispatchQueue {
    inner: Rc<RefCell<QueueState>>,
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("DispatchQueue")
            .field("handlers", &state.handlers.len())
            .field("pending", &state.pending.len())
            .field("active", &state.active.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl DispatchQueue {
    /// Creates a queue without a flush requester.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueState {
                handlers: HashMap::new(),
                pending: BTreeSet::new(),
                active: BTreeSet::new(),
                next_id: 1,
                flush_requested: false,
                flushing: false,
                closed: false,
                request_flush: None,
            })),
        }
    }

    /// Creates a queue that calls `request_flush` whenever a flush becomes
    /// necessary. Requests are coalesced until the next flush.
    pub fn with_flush_requester<F>(request_flush: F) -> Self
    where
        F: Fn() + 'static,
    {
        let queue = Self::new();
        queue.inner.borrow_mut().request_flush = Some(Rc::new(request_flush));
        queue
    }

    /// Registers a handler group and returns its id.
    ///
    /// The handler is not scheduled. On a closed queue the handler is dropped
    /// and the returned id is never valid.
    pub fn register<F>(&self, handler: F) -> HandlerId
    where
        F: Fn() + 'static,
    {
        let mut state = self.inner.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        if !state.closed {
            state.handlers.insert(id, Rc::new(handler));
        }
        id
    }

    /// Schedules `id` for the next flush.
    ///
    /// An active handler moves back to pending, so a handler that schedules
    /// itself while running is invoked again by the next flush, not this one.
    pub fn schedule(&self, id: HandlerId) {
        let requester = {
            let mut state = self.inner.borrow_mut();
            if state.closed {
                #[cfg(feature = "tracing")]
                trace!(id, "schedule on a closed dispatch queue ignored");
                return;
            }
            if !state.handlers.contains_key(&id) {
                return;
            }
            state.active.remove(&id);
            state.pending.insert(id);
            if state.flush_requested {
                None
            } else {
                state.flush_requested = true;
                state.request_flush.clone()
            }
        };
        if let Some(request_flush) = requester {
            request_flush();
        }
    }

    /// Like [`schedule`](Self::schedule), but reports a closed queue or an
    /// unknown id.
    pub fn try_schedule(&self, id: HandlerId) -> Result<()> {
        {
            let state = self.inner.borrow();
            if state.closed {
                return Err(Error::QueueClosed);
            }
            if !state.handlers.contains_key(&id) {
                return Err(Error::unknown_handler(id));
            }
        }
        self.schedule(id);
        Ok(())
    }

    /// Takes `id` out of the flush in progress. Pending handlers stay
    /// pending.
    pub fn unschedule_active(&self, id: HandlerId) {
        let mut state = self.inner.borrow_mut();
        if !state.closed {
            state.active.remove(&id);
        }
    }

    /// Takes `id` out of both sets.
    pub fn unschedule(&self, id: HandlerId) {
        let mut state = self.inner.borrow_mut();
        if !state.closed {
            state.pending.remove(&id);
            state.active.remove(&id);
        }
    }

    /// Unschedules `id` and drops its handler.
    pub fn remove(&self, id: HandlerId) {
        let removed = {
            let mut state = self.inner.borrow_mut();
            state.pending.remove(&id);
            state.active.remove(&id);
            state.handlers.remove(&id)
        };
        // The handler may own values whose drop touches the queue.
        drop(removed);
    }

    /// Returns where `id` currently stands.
    pub fn state(&self, id: HandlerId) -> HandlerState {
        let state = self.inner.borrow();
        if state.pending.contains(&id) {
            HandlerState::Pending
        } else if state.active.contains(&id) {
            HandlerState::Active
        } else {
            HandlerState::Unregistered
        }
    }

    /// Returns true if `id` has a registered handler.
    pub fn contains(&self, id: HandlerId) -> bool {
        self.inner.borrow().handlers.contains_key(&id)
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Returns true if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().handlers.is_empty()
    }

    /// Returns true if a handler waits for the next flush.
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    /// Returns true once the queue was shut down.
    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    /// Invokes every pending handler once and returns how many ran.
    ///
    /// Pending handlers become active first; anything scheduled while the
    /// flush runs lands in the fresh pending set and waits for the next
    /// flush. A handler removed or unscheduled before its turn is skipped.
    /// A nested call from inside a handler does nothing.
    pub fn flush(&self) -> usize {
        {
            let mut state = self.inner.borrow_mut();
            if state.closed || state.flushing {
                return 0;
            }
            state.flushing = true;
            state.flush_requested = false;
            let pending = mem::take(&mut state.pending);
            state.active.extend(pending);
            #[cfg(feature = "tracing")]
            debug!(active = state.active.len(), "dispatch flush started");
        }

        let mut invoked = 0;
        loop {
            let next = {
                let mut state = self.inner.borrow_mut();
                let id = match state.active.first() {
                    Some(id) => *id,
                    None => break,
                };
                match state.handlers.get(&id) {
                    Some(handler) => Some((id, Rc::clone(handler))),
                    None => {
                        state.active.remove(&id);
                        None
                    }
                }
            };
            let (id, handler) = match next {
                Some(next) => next,
                None => continue,
            };

            handler();
            invoked += 1;

            let mut state = self.inner.borrow_mut();
            if state.active.first() == Some(&id) {
                state.active.remove(&id);
            }
        }

        self.inner.borrow_mut().flushing = false;
        #[cfg(feature = "tracing")]
        debug!(invoked, "dispatch flush finished");
        invoked
    }

    /// Closes the queue for good and drops every handler.
    pub fn shutdown(&self) {
        let (handlers, requester) = {
            let mut state = self.inner.borrow_mut();
            if state.closed {
                return;
            }
            state.closed = true;
            state.pending.clear();
            state.active.clear();
            (mem::take(&mut state.handlers), state.request_flush.take())
        };
        #[cfg(feature = "tracing")]
        debug!(handlers = handlers.len(), "dispatch queue shut down");
        drop(handlers);
        drop(requester);
    }

    /// Returns a handle that does not keep the queue alive.
    pub fn downgrade(&self) -> WeakDispatchQueue {
        WeakDispatchQueue {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to a [`DispatchQueue`].
///
/// Once every `DispatchQueue` clone is dropped, `upgrade` returns `None` and
/// the queue behaves as shut down.
#[derive(Clone, Debug, Default)]
pub struct WeakDispatchQueue {
    inner: Weak<RefCell<QueueState>>,
}

impl WeakDispatchQueue {
    pub fn upgrade(&self) -> Option<DispatchQueue> {
        self.inner.upgrade().map(|inner| DispatchQueue { inner })
    }
}
