//! Runnel Core - Lifetimes, consumers and producers.
//!
//! This crate provides the primitives of the Runnel push-based reactive
//! runtime:
//!
//! - `Lifetime`: An owner of cleanup actions, released exactly once
//! - `Consumer`: The sink of a subscription (next / error / done)
//! - `Producer`: A lazy description of a value sequence
//! - `Operator`: A producer-to-producer transform, applied with `|`
//! - Leaf sources: `single`, `vector`, `range`, `ints`, `complete`, `fail`,
//!   `never`, `deferred`
//! - `Error`: Error type for the few fallible library calls
//!
//! Everything here is single-threaded (`Rc` / `RefCell`). Pushes run inline on
//! the calling thread and may re-enter.
//!
//! # Example
//!
//! ```rust
//! use runnel_core::{vector, Lifetime};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_clone = seen.clone();
//!
//! let mut lifetime = Lifetime::new();
//! vector(vec![1, 2, 3]).start_with_next_into(
//!     move |value| seen_clone.borrow_mut().push(value),
//!     &mut lifetime,
//! );
//!
//! assert_eq!(*seen.borrow(), vec![1, 2, 3]);
//! ```

#![no_std]

extern crate alloc;

pub mod consumer;
mod error;
pub mod lifetime;
pub mod producer;
pub mod source;

pub use consumer::Consumer;
pub use error::{Error, HandlerId, Result};
pub use lifetime::Lifetime;
pub use producer::{EmptyValue, NoError, Operator, Producer};
pub use source::{complete, deferred, fail, ints, never, range, single, vector};
