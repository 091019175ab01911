//! Runnel Operators - Composable transformations of producers.
//!
//! Every operator is a value implementing [`runnel_core::Operator`] and is
//! applied with `producer | operator`, [`Producer::pipe`], or the matching
//! [`ProducerExt`] method.
//!
//! # Operators
//!
//! - Mapping: `map`, `map_to`, `to_empty`, `map_error`, `map_error_to_done`
//! - Filtering: `filter`, `filter_optional`, `distinct_until_changed`
//! - Side effects: `before_next`, `after_next`
//! - Counting: `take`, `skip`, `take_while`
//! - Sequencing: `then`
//! - Combining: `merge`, `merge_all`, `combine`, `combine_all`,
//!   `combine_previous`
//! - Switching: `flatten_latest`, `conditional`
//!
//! # Example
//!
//! ```rust
//! use runnel_core::vector;
//! use runnel_operators::{filter, map};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_clone = seen.clone();
//!
//! let _lifetime = (vector(vec![1, 2, 3, 4, 5])
//!     | filter(|x: &i32| x % 2 == 0)
//!     | map(|x: i32| x * 10))
//! .start_with_next(move |value| seen_clone.borrow_mut().push(value));
//!
//! assert_eq!(*seen.borrow(), vec![20, 40]);
//! ```
//!
//! [`Producer::pipe`]: runnel_core::Producer::pipe

#![no_std]

extern crate alloc;

mod combine;
mod ext;
mod filter;
mod flatten;
mod forward;
mod map;
mod merge;
mod take;
mod then;

#[cfg(test)]
mod test_support;

pub use combine::{combine, combine_all, combine_previous, combine_previous_with, CombinePrevious};
pub use ext::ProducerExt;
pub use filter::{
    after_next, before_next, distinct_until_changed, filter, filter_optional, AfterNext,
    BeforeNext, DistinctUntilChanged, Filter, FilterOptional,
};
pub use flatten::{conditional, flatten_latest, FlattenLatest};
pub use map::{
    map, map_error, map_error_to_done, map_to, to_empty, Map, MapError, MapErrorToDone, MapTo,
};
pub use merge::{merge, merge_all, merge_with, MergeWith};
pub use take::{skip, take, take_while, Skip, Take, TakeWhile};
pub use then::{then, Then};
