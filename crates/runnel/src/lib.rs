//! Runnel - A single-threaded, push-based reactive runtime.
//!
//! This crate re-exports the Runnel building blocks:
//!
//! - [`runnel_core`]: `Lifetime`, `Consumer`, `Producer` and the leaf sources
//! - [`runnel_operators`]: composable producer transformations
//! - [`runnel_reactive`]: `EventStream`, `Variable`, `DispatchQueue`, `Observable`
//!
//! Most code only needs the [`prelude`].
//!
//! # Example
//!
//! ```rust
//! use runnel::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_clone = seen.clone();
//!
//! let mut lifetime = Lifetime::new();
//! vector(vec![1, 2, 3, 4, 5])
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * 10)
//!     .start_with_next_into(move |v| seen_clone.borrow_mut().push(v), &mut lifetime);
//!
//! assert_eq!(*seen.borrow(), vec![20, 40]);
//! ```

#![no_std]

pub use runnel_core;
pub use runnel_operators;
pub use runnel_reactive;

pub use runnel_core::{Consumer, Error, HandlerId, Lifetime, NoError, Operator, Producer, Result};
pub use runnel_reactive::{DispatchQueue, EventStream, Observable, Variable};

/// Everything needed to build, start and feed pipelines.
pub mod prelude {
    pub use runnel_core::{
        complete, deferred, fail, ints, never, range, single, vector, Consumer, EmptyValue,
        Lifetime, NoError, Operator, Producer,
    };
    pub use runnel_operators::{
        after_next, before_next, combine, combine_all, combine_previous, combine_previous_with,
        conditional, distinct_until_changed, filter, filter_optional, flatten_latest, map,
        map_error, map_error_to_done, map_to, merge, merge_all, merge_with, skip, take,
        take_while, then, to_empty, ProducerExt,
    };
    pub use runnel_reactive::{
        start_to_stream, DispatchQueue, EventStream, HandlerState, Observable, Variable,
    };
}
