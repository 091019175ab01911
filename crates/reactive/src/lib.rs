//! Runnel Reactive - Hand-fired sources and deferred dispatch.
//!
//! This crate builds the stateful pieces of Runnel on top of the producer
//! primitives in `runnel-core`.
//!
//! # Core Concepts
//!
//! - `EventStream`: A multicast source with a live set of consumers
//! - `Variable`: A cached value plus the stream of its changes
//! - `DispatchQueue`: Pending/active registry of handlers flushed by the host
//! - `Observable`: Queued notifications delivered at flush time
//!
//! # Example
//!
//! ```rust
//! use runnel_reactive::{DispatchQueue, Observable, Variable};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let variable = Variable::new(5);
//! let seen_clone = seen.clone();
//! let _watch = variable
//!     .value()
//!     .start_with_next(move |v| seen_clone.borrow_mut().push(v));
//! variable.set(6);
//!
//! let queue = DispatchQueue::new();
//! let observable = Observable::new(&queue);
//! let seen_clone = seen.clone();
//! let _observe = observable.subscribe(move |v: &i32| seen_clone.borrow_mut().push(*v));
//! observable.notify(7);
//! assert_eq!(*seen.borrow(), vec![5, 6]);
//!
//! queue.flush();
//! assert_eq!(*seen.borrow(), vec![5, 6, 7]);
//! ```

#![no_std]

extern crate alloc;

pub mod dispatch;
pub mod event_stream;
pub mod observable;
pub mod variable;

pub use dispatch::{DispatchQueue, Handler, HandlerState, WeakDispatchQueue};
pub use event_stream::{start_to_stream, EventStream};
pub use observable::Observable;
pub use variable::Variable;

// Re-export commonly used types from runnel-core
pub use runnel_core::HandlerId;
