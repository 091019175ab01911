//! Counting operators: take, skip, take_while.
//!
//! Counts are `usize`, so a negative count cannot be expressed.

use crate::forward::start_forwarding;
use alloc::rc::Rc;
use core::marker::PhantomData;
use runnel_core::{Consumer, Lifetime, Operator, Producer};

/// Operator returned by [`take`].
#[derive(Clone, Copy, Debug)]
pub struct Take {
    count: usize,
}

/// Forwards the first `count` values, then completes.
///
/// With `count == 0` the result completes on start without subscribing to
/// the input at all.
pub fn take(count: usize) -> Take {
    Take { count }
}

impl<T, E> Operator<T, E> for Take
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        let count = self.count;
        Producer::new(move |consumer: Consumer<T, E>| {
            if count == 0 {
                consumer.put_done();
                return Lifetime::new();
            }
            let remaining = consumer.make_state(count);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                let left = {
                    let mut remaining = remaining.borrow_mut();
                    if *remaining == 0 {
                        return;
                    }
                    *remaining -= 1;
                    *remaining
                };
                consumer.put_next(value);
                if left == 0 {
                    consumer.put_done();
                }
            })
        })
    }
}

/// Operator returned by [`skip`].
#[derive(Clone, Copy, Debug)]
pub struct Skip {
    count: usize,
}

/// Drops the first `count` values and forwards the rest.
pub fn skip(count: usize) -> Skip {
    Skip { count }
}

impl<T, E> Operator<T, E> for Skip
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        let count = self.count;
        Producer::new(move |consumer: Consumer<T, E>| {
            let skipping = consumer.make_state(count);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                let skip = {
                    let mut skipping = skipping.borrow_mut();
                    if *skipping > 0 {
                        *skipping -= 1;
                        true
                    } else {
                        false
                    }
                };
                if !skip {
                    consumer.put_next(value);
                }
            })
        })
    }
}

/// Operator returned by [`take_while`].
pub struct TakeWhile<T, F> {
    predicate: F,
    _marker: PhantomData<fn(T)>,
}

/// Forwards values while `predicate` holds; the first value that fails it
/// is dropped and the result completes.
pub fn take_while<T, F>(predicate: F) -> TakeWhile<T, F>
where
    F: Fn(&T) -> bool + 'static,
{
    TakeWhile {
        predicate,
        _marker: PhantomData,
    }
}

impl<T, E, F> Operator<T, E> for TakeWhile<T, F>
where
    T: 'static,
    E: 'static,
    F: Fn(&T) -> bool + 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        let predicate = Rc::new(self.predicate);
        Producer::new(move |consumer: Consumer<T, E>| {
            let predicate = Rc::clone(&predicate);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                if predicate(&value) {
                    consumer.put_next(value);
                } else {
                    consumer.put_done();
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::before_next;
    use crate::test_support::{collect, Manual};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;
    use runnel_core::{ints, never, range, vector};

    #[test]
    fn test_take_basic() {
        assert_eq!(collect(ints(0, 10) | take(3)), (vec![0, 1, 2], true));
    }

    #[test]
    fn test_take_more_than_available() {
        assert_eq!(collect(vector(vec![1, 2]) | take(5)), (vec![1, 2], true));
    }

    #[test]
    fn test_take_zero_completes_without_subscribing() {
        let manual = Manual::<i32, ()>::new();
        let (values, done) = collect(manual.producer() | take(0));
        assert!(values.is_empty());
        assert!(done);
        assert_eq!(manual.starts(), 0);
    }

    #[test]
    fn test_take_completes_infinite_source() {
        let manual = Manual::<i32, ()>::new();
        let (log, _lifetime) = crate::test_support::record(manual.producer() | take(2));

        manual.next(1);
        assert!(!log.borrow().done);
        manual.next(2);
        assert!(log.borrow().done);
        manual.next(3);

        assert_eq!(log.borrow().values, vec![1, 2]);
        assert_eq!(manual.releases(), 1);
    }

    #[test]
    fn test_take_stops_sync_source() {
        let pushed = Rc::new(Cell::new(0));
        let pushed_clone = pushed.clone();
        let producer = ints(0, 1_000_000)
            | before_next(move |_: &i32| pushed_clone.set(pushed_clone.get() + 1))
            | take(3);

        assert_eq!(collect(producer), (vec![0, 1, 2], true));
        assert_eq!(pushed.get(), 3);
    }

    #[test]
    fn test_take_ends_endless_source() {
        assert_eq!(collect(range(0u64..) | take(3)), (vec![0, 1, 2], true));
        assert_eq!(collect(range(0..) | skip(5) | take(2)), (vec![5, 6], true));
    }

    #[test]
    fn test_take_while_ends_endless_source() {
        let producer = range(0..) | take_while(|x: &i32| *x < 4);
        assert_eq!(collect(producer), (vec![0, 1, 2, 3], true));
    }

    #[test]
    fn test_take_never_does_not_complete() {
        assert_eq!(collect(never::<i32>() | take(1)), (vec![], false));
    }

    #[test]
    fn test_skip_basic() {
        assert_eq!(collect(ints(0, 6) | skip(4)), (vec![4, 5], true));
        assert_eq!(collect(ints(0, 3) | skip(0)), (vec![0, 1, 2], true));
        assert_eq!(collect(ints(0, 3) | skip(10)), (vec![], true));
    }

    #[test]
    fn test_skip_then_take() {
        assert_eq!(collect(ints(0, 10) | skip(2) | take(3)), (vec![2, 3, 4], true));
    }

    #[test]
    fn test_take_while() {
        let producer = vector(vec![1, 2, 5, 1]) | take_while(|x: &i32| *x < 3);
        assert_eq!(collect(producer), (vec![1, 2], true));
    }
}
