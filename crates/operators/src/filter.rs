//! Filtering operators and side-effect injectors.

use crate::forward::start_forwarding;
use alloc::rc::Rc;
use core::marker::PhantomData;
use runnel_core::{Consumer, Operator, Producer};

/// Operator returned by [`filter`].
pub struct Filter<T, F> {
    predicate: F,
    _marker: PhantomData<fn(T)>,
}

/// Forwards only the values for which `predicate` returns true.
pub fn filter<T, F>(predicate: F) -> Filter<T, F>
where
    F: Fn(&T) -> bool + 'static,
{
    Filter {
        predicate,
        _marker: PhantomData,
    }
}

impl<T, E, F> Operator<T, E> for Filter<T, F>
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
                }
            })
        })
    }
}

/// Operator returned by [`filter_optional`].
pub struct FilterOptional;

/// Unwraps `Some` values and drops `None`.
pub fn filter_optional() -> FilterOptional {
    FilterOptional
}

impl<T, E> Operator<Option<T>, E> for FilterOptional
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<Option<T>, E>) -> Producer<T, E> {
        Producer::new(move |consumer: Consumer<T, E>| {
            start_forwarding(input.clone(), consumer, |value, consumer| {
                if let Some(value) = value {
                    consumer.put_next(value);
                }
            })
        })
    }
}

/// Operator returned by [`distinct_until_changed`].
pub struct DistinctUntilChanged;

/// Drops values equal to the value forwarded just before them.
pub fn distinct_until_changed() -> DistinctUntilChanged {
    DistinctUntilChanged
}

impl<T, E> Operator<T, E> for DistinctUntilChanged
where
    T: Clone + PartialEq + 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        Producer::new(move |consumer: Consumer<T, E>| {
            let previous = consumer.make_state(None::<T>);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                let changed = {
                    let mut previous = previous.borrow_mut();
                    if previous.as_ref() == Some(&value) {
                        false
                    } else {
                        *previous = Some(value.clone());
                        true
                    }
                };
                if changed {
                    consumer.put_next(value);
                }
            })
        })
    }
}

/// Operator returned by [`before_next`].
pub struct BeforeNext<T, F> {
    method: F,
    _marker: PhantomData<fn(T)>,
}

/// Calls `method` with each value right before forwarding it.
pub fn before_next<T, F>(method: F) -> BeforeNext<T, F>
where
    F: Fn(&T) + 'static,
{
    BeforeNext {
        method,
        _marker: PhantomData,
    }
}

impl<T, E, F> Operator<T, E> for BeforeNext<T, F>
where
    T: 'static,
    E: 'static,
    F: Fn(&T) + 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        let method = Rc::new(self.method);
        Producer::new(move |consumer: Consumer<T, E>| {
            let method = Rc::clone(&method);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                method(&value);
                consumer.put_next(value);
            })
        })
    }
}

/// Operator returned by [`after_next`].
pub struct AfterNext<T, F> {
    method: F,
    _marker: PhantomData<fn(T)>,
}

/// Calls `method` with each value right after forwarding it.
pub fn after_next<T, F>(method: F) -> AfterNext<T, F>
where
    F: Fn(&T) + 'static,
{
    AfterNext {
        method,
        _marker: PhantomData,
    }
}

impl<T, E, F> Operator<T, E> for AfterNext<T, F>
where
    T: Clone + 'static,
    E: 'static,
    F: Fn(&T) + 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        let method = Rc::new(self.method);
        Producer::new(move |consumer: Consumer<T, E>| {
            let method = Rc::clone(&method);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                let copy = value.clone();
                consumer.put_next(value);
                method(&copy);
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::collect;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use runnel_core::{vector, Lifetime};

    #[test]
    fn test_filter_basic() {
        let producer = vector(vec![1, 2, 3, 4, 5]) | filter(|x: &i32| x % 2 == 1);
        assert_eq!(collect(producer), (vec![1, 3, 5], true));
    }

    #[test]
    fn test_filter_none_match() {
        let producer = vector(vec![1, 2, 3]) | filter(|x: &i32| *x > 100);
        assert_eq!(collect(producer), (vec![], true));
    }

    #[test]
    fn test_filter_optional() {
        let producer = vector(vec![Some(1), None, Some(3)]) | filter_optional();
        assert_eq!(collect(producer), (vec![1, 3], true));
    }

    #[test]
    fn test_distinct_until_changed() {
        let producer = vector(vec![1, 1, 2, 2, 2, 1, 3, 3]) | distinct_until_changed();
        assert_eq!(collect(producer), (vec![1, 2, 1, 3], true));
    }

    #[test]
    fn test_distinct_until_changed_per_subscription() {
        let producer = vector(vec![7, 7]) | distinct_until_changed();
        assert_eq!(collect(producer.clone()), (vec![7], true));
        assert_eq!(collect(producer), (vec![7], true));
    }

    #[test]
    fn test_before_and_after_next_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (before, after, sink) = (log.clone(), log.clone(), log.clone());

        let producer = vector(vec![1, 2])
            | before_next(move |x: &i32| before.borrow_mut().push(("before", *x)))
            | after_next(move |x: &i32| after.borrow_mut().push(("after", *x)));

        let mut lifetime = Lifetime::new();
        producer.start_with_next_into(move |x| sink.borrow_mut().push(("next", x)), &mut lifetime);

        assert_eq!(
            *log.borrow(),
            vec![
                ("before", 1),
                ("next", 1),
                ("after", 1),
                ("before", 2),
                ("next", 2),
                ("after", 2),
            ]
        );
    }
}
