//! Value and error mapping operators.

use crate::forward::{start_forwarding, start_linked};
use alloc::rc::Rc;
use core::marker::PhantomData;
use runnel_core::{Consumer, EmptyValue, NoError, Operator, Producer};

/// Operator returned by [`map`].
pub struct Map<T, F> {
    mapper: F,
    _marker: PhantomData<fn(T)>,
}

/// Transforms every value with `mapper`; errors and completion pass through.
///
/// # Example
///
/// ```ignore
/// let tens = vector(vec![1, 2]) | map(|x: i32| x * 10);
/// ```
pub fn map<T, U, F>(mapper: F) -> Map<T, F>
where
    F: Fn(T) -> U + 'static,
{
    Map {
        mapper,
        _marker: PhantomData,
    }
}

impl<T, U, E, F> Operator<T, E> for Map<T, F>
where
    T: 'static,
    U: 'static,
    E: 'static,
    F: Fn(T) -> U + 'static,
{
    type Value = U;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<U, E> {
        let mapper = Rc::new(self.mapper);
        Producer::new(move |consumer: Consumer<U, E>| {
            let mapper = Rc::clone(&mapper);
            start_forwarding(input.clone(), consumer, move |value, consumer| {
                consumer.put_next(mapper(value));
            })
        })
    }
}

/// Operator returned by [`map_to`].
pub struct MapTo<U> {
    value: U,
}

/// Replaces every value with a clone of `value`.
pub fn map_to<U: Clone + 'static>(value: U) -> MapTo<U> {
    MapTo { value }
}

impl<T, U, E> Operator<T, E> for MapTo<U>
where
    T: 'static,
    U: Clone + 'static,
    E: 'static,
{
    type Value = U;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<U, E> {
        let value = Rc::new(self.value);
        Producer::new(move |consumer: Consumer<U, E>| {
            let value = Rc::clone(&value);
            start_forwarding(input.clone(), consumer, move |_, consumer| {
                consumer.put_next_copy(&value);
            })
        })
    }
}

/// Replaces every value with `()`.
pub fn to_empty() -> MapTo<EmptyValue> {
    map_to(())
}

/// Operator returned by [`map_error`].
pub struct MapError<E, F> {
    mapper: F,
    _marker: PhantomData<fn(E)>,
}

/// Transforms the error with `mapper`; values and completion pass through.
pub fn map_error<E, E2, F>(mapper: F) -> MapError<E, F>
where
    F: Fn(E) -> E2 + 'static,
{
    MapError {
        mapper,
        _marker: PhantomData,
    }
}

impl<T, E, E2, F> Operator<T, E> for MapError<E, F>
where
    T: 'static,
    E: 'static,
    E2: 'static,
    F: Fn(E) -> E2 + 'static,
{
    type Value = T;
    type Error = E2;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E2> {
        let mapper = Rc::new(self.mapper);
        Producer::new(move |consumer: Consumer<T, E2>| {
            let mapper = Rc::clone(&mapper);
            let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
            start_linked(
                input.clone(),
                &consumer,
                move |value| {
                    on_next.put_next(value);
                },
                move |error| on_error.put_error(mapper(error)),
                move || on_done.put_done(),
            )
        })
    }
}

/// Operator returned by [`map_error_to_done`].
pub struct MapErrorToDone;

/// Turns an error into plain completion. The result can no longer fail.
pub fn map_error_to_done() -> MapErrorToDone {
    MapErrorToDone
}

impl<T, E> Operator<T, E> for MapErrorToDone
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = NoError;

    fn apply(self, input: Producer<T, E>) -> Producer<T, NoError> {
        Producer::new(move |consumer: Consumer<T, NoError>| {
            let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
            start_linked(
                input.clone(),
                &consumer,
                move |value| {
                    on_next.put_next(value);
                },
                move |_| on_error.put_done(),
                move || on_done.put_done(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{collect, record};
    use alloc::string::{String, ToString};
    use alloc::vec;
    use runnel_core::{fail, vector};

    #[test]
    fn test_map_basic() {
        let producer = vector(vec![1, 2, 3]) | map(|x: i32| x * 2);
        assert_eq!(collect(producer), (vec![2, 4, 6], true));
    }

    #[test]
    fn test_map_changes_type() {
        let producer = vector(vec![1, 22]) | map(|x: i32| x.to_string());
        assert_eq!(
            collect(producer),
            (vec![String::from("1"), String::from("22")], true)
        );
    }

    #[test]
    fn test_map_identity() {
        let source = vector(vec![5, 3, 8]);
        assert_eq!(collect(source.clone() | map(|x: i32| x)), collect(source));
    }

    #[test]
    fn test_map_passes_error() {
        let producer = fail::<i32, &'static str>("boom") | map(|x: i32| x + 1);
        let (log, _lifetime) = record(producer);
        assert!(log.borrow().values.is_empty());
        assert_eq!(log.borrow().error, Some("boom"));
        assert!(!log.borrow().done);
    }

    #[test]
    fn test_map_to_and_to_empty() {
        assert_eq!(collect(vector(vec![1, 2]) | map_to("x")), (vec!["x", "x"], true));
        assert_eq!(collect(vector(vec![1, 2]) | to_empty()), (vec![(), ()], true));
    }

    #[test]
    fn test_map_error() {
        let producer = fail::<i32, i32>(4) | map_error(|e: i32| e * 100);
        let (log, _lifetime) = record(producer);
        assert_eq!(log.borrow().error, Some(400));
    }

    #[test]
    fn test_map_error_to_done() {
        let producer = fail::<i32, i32>(4) | map_error_to_done();
        let (log, _lifetime) = record(producer);
        assert_eq!(log.borrow().error, None);
        assert!(log.borrow().done);
    }
}
