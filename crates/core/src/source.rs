//! Leaf producers.
//!
//! Apart from `never` and `deferred`, these push their whole content
//! synchronously inside `start` and then complete.

use crate::consumer::Consumer;
use crate::lifetime::Lifetime;
use crate::producer::{NoError, Producer};
use alloc::vec::Vec;

/// A producer that emits one clone of `value` and completes.
pub fn single<T>(value: T) -> Producer<T>
where
    T: Clone + 'static,
{
    Producer::new(move |consumer: Consumer<T, NoError>| {
        consumer.put_next_copy(&value);
        consumer.put_done();
        Lifetime::new()
    })
}

/// A producer that emits every element of `values` in order and completes.
pub fn vector<T>(values: Vec<T>) -> Producer<T>
where
    T: Clone + 'static,
{
    Producer::new(move |consumer: Consumer<T, NoError>| {
        for value in &values {
            if !consumer.put_next_copy(value) {
                break;
            }
        }
        consumer.put_done();
        Lifetime::new()
    })
}

/// A producer that walks a fresh clone of `iter` on every start.
///
/// # Example
///
/// ```ignore
/// let squares = range((1..=3).map(|x| x * x));
/// ```
pub fn range<I>(iter: I) -> Producer<I::Item>
where
    I: IntoIterator + Clone + 'static,
    I::Item: 'static,
{
    Producer::new(move |consumer: Consumer<I::Item, NoError>| {
        for value in iter.clone() {
            if !consumer.put_next(value) {
                break;
            }
        }
        consumer.put_done();
        Lifetime::new()
    })
}

/// A producer of the integers in `[from, till)`.
///
/// # Panics
///
/// Panics if `from > till`.
pub fn ints(from: i32, till: i32) -> Producer<i32> {
    assert!(from <= till, "ints: from ({}) must not exceed till ({})", from, till);
    range(from..till)
}

/// A producer that completes immediately without values.
pub fn complete<T: 'static>() -> Producer<T> {
    Producer::new(|consumer: Consumer<T, NoError>| {
        consumer.put_done();
        Lifetime::new()
    })
}

/// A producer that fails immediately with a clone of `error`.
pub fn fail<T, E>(error: E) -> Producer<T, E>
where
    T: 'static,
    E: Clone + 'static,
{
    Producer::new(move |consumer: Consumer<T, E>| {
        consumer.put_error(error.clone());
        Lifetime::new()
    })
}

/// A producer that never emits and never completes.
pub fn never<T: 'static>() -> Producer<T> {
    Producer::new(|_: Consumer<T, NoError>| Lifetime::new())
}

/// A producer that calls `creator` on every start and follows the producer
/// it returns.
///
/// Lets each subscription own independent generator state.
pub fn deferred<T, E, C>(creator: C) -> Producer<T, E>
where
    T: 'static,
    E: 'static,
    C: Fn() -> Producer<T, E> + 'static,
{
    Producer::new(move |consumer: Consumer<T, E>| creator().start_existing(consumer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::{Cell, RefCell};

    fn collect<T: 'static>(producer: Producer<T>) -> (Vec<T>, bool) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let done = Rc::new(Cell::new(false));
        let (values_clone, done_clone) = (values.clone(), done.clone());
        let _lifetime = producer.start_with_next_done(
            move |v| values_clone.borrow_mut().push(v),
            move || done_clone.set(true),
        );
        let values = values.borrow_mut().drain(..).collect();
        (values, done.get())
    }

    #[test]
    fn test_single() {
        assert_eq!(collect(single(7)), (vec![7], true));
    }

    #[test]
    fn test_vector() {
        assert_eq!(collect(vector(vec![1, 2, 3])), (vec![1, 2, 3], true));
        assert_eq!(collect(vector(Vec::<i32>::new())), (vec![], true));
    }

    #[test]
    fn test_vector_restartable() {
        let producer = vector(vec!["a", "b"]);
        assert_eq!(collect(producer.clone()), (vec!["a", "b"], true));
        assert_eq!(collect(producer), (vec!["a", "b"], true));
    }

    #[test]
    fn test_range() {
        assert_eq!(collect(range((1..=3).map(|x| x * x))), (vec![1, 4, 9], true));
    }

    #[test]
    fn test_ints() {
        assert_eq!(collect(ints(0, 4)), (vec![0, 1, 2, 3], true));
        assert_eq!(collect(ints(5, 5)), (vec![], true));
    }

    #[test]
    #[should_panic(expected = "must not exceed")]
    fn test_ints_reversed_bounds() {
        let _ = ints(3, 1);
    }

    #[test]
    fn test_complete() {
        assert_eq!(collect(complete::<i32>()), (vec![], true));
    }

    #[test]
    fn test_never() {
        assert_eq!(collect(never::<i32>()), (vec![], false));
    }

    #[test]
    fn test_fail() {
        let error = Rc::new(Cell::new(0));
        let error_clone = error.clone();
        let _lifetime = fail::<i32, i32>(42).start_with_error(move |e| error_clone.set(e));
        assert_eq!(error.get(), 42);
    }

    #[test]
    fn test_deferred_creates_per_subscription() {
        let created = Rc::new(Cell::new(0));
        let created_clone = created.clone();
        let producer = deferred(move || {
            created_clone.set(created_clone.get() + 1);
            single(created_clone.get())
        });
        assert_eq!(created.get(), 0);

        assert_eq!(collect(producer.clone()), (vec![1], true));
        assert_eq!(collect(producer), (vec![2], true));
        assert_eq!(created.get(), 2);
    }
}
