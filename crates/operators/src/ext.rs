//! Method-call syntax for the operators.
//!
//! `producer.map(f)` is the same as `producer | map(f)`. Closures passed to
//! these methods get their argument types from the producer, so they need no
//! annotations.

use crate::combine::combine_previous;
use crate::filter::{
    after_next, before_next, distinct_until_changed, filter, filter_optional, FilterOptional,
};
use crate::flatten::{flatten_latest, FlattenLatest};
use crate::map::{map, map_error, map_error_to_done, map_to, to_empty};
use crate::merge::merge;
use crate::take::{skip, take, take_while};
use crate::then::then;
use runnel_core::{EmptyValue, NoError, Operator, Producer};

/// Operator methods on [`Producer`].
pub trait ProducerExt<T: 'static, E: 'static>: Sized {
    /// See [`map`](crate::map()).
    fn map<U, F>(self, mapper: F) -> Producer<U, E>
    where
        U: 'static,
        F: Fn(T) -> U + 'static;

    /// See [`map_to`](crate::map_to()).
    fn map_to<U>(self, value: U) -> Producer<U, E>
    where
        U: Clone + 'static;

    /// See [`to_empty`](crate::to_empty()).
    fn to_empty(self) -> Producer<EmptyValue, E>;

    /// See [`map_error`](crate::map_error()).
    fn map_error<E2, F>(self, mapper: F) -> Producer<T, E2>
    where
        E2: 'static,
        F: Fn(E) -> E2 + 'static;

    /// See [`map_error_to_done`](crate::map_error_to_done()).
    fn map_error_to_done(self) -> Producer<T, NoError>;

    /// See [`filter`](crate::filter()).
    fn filter<F>(self, predicate: F) -> Producer<T, E>
    where
        F: Fn(&T) -> bool + 'static;

    /// See [`filter_optional`](crate::filter_optional()).
    fn filter_optional<U>(self) -> Producer<U, E>
    where
        FilterOptional: Operator<T, E, Value = U, Error = E>;

    /// See [`distinct_until_changed`](crate::distinct_until_changed()).
    fn distinct_until_changed(self) -> Producer<T, E>
    where
        T: Clone + PartialEq;

    /// See [`before_next`](crate::before_next()).
    fn before_next<F>(self, method: F) -> Producer<T, E>
    where
        F: Fn(&T) + 'static;

    /// See [`after_next`](crate::after_next()).
    fn after_next<F>(self, method: F) -> Producer<T, E>
    where
        T: Clone,
        F: Fn(&T) + 'static;

    /// See [`take`](crate::take()).
    fn take(self, count: usize) -> Producer<T, E>;

    /// See [`skip`](crate::skip()).
    fn skip(self, count: usize) -> Producer<T, E>;

    /// See [`take_while`](crate::take_while()).
    fn take_while<F>(self, predicate: F) -> Producer<T, E>
    where
        F: Fn(&T) -> bool + 'static;

    /// See [`then`](crate::then()).
    fn then(self, following: Producer<T, E>) -> Producer<T, E>;

    /// See [`merge`](crate::merge()).
    fn merge_with(self, other: Producer<T, E>) -> Producer<T, E>;

    /// See [`combine_previous`](crate::combine_previous()).
    fn combine_previous(self) -> Producer<(T, T), E>
    where
        T: Clone;

    /// See [`flatten_latest`](crate::flatten_latest()).
    fn flatten_latest<U>(self) -> Producer<U, E>
    where
        FlattenLatest: Operator<T, E, Value = U, Error = E>;
}

impl<T: 'static, E: 'static> ProducerExt<T, E> for Producer<T, E> {
    fn map<U, F>(self, mapper: F) -> Producer<U, E>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        self | map(mapper)
    }

    fn map_to<U>(self, value: U) -> Producer<U, E>
    where
        U: Clone + 'static,
    {
        self | map_to(value)
    }

    fn to_empty(self) -> Producer<EmptyValue, E> {
        self | to_empty()
    }

    fn map_error<E2, F>(self, mapper: F) -> Producer<T, E2>
    where
        E2: 'static,
        F: Fn(E) -> E2 + 'static,
    {
        self | map_error(mapper)
    }

    fn map_error_to_done(self) -> Producer<T, NoError> {
        self | map_error_to_done()
    }

    fn filter<F>(self, predicate: F) -> Producer<T, E>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self | filter(predicate)
    }

    fn filter_optional<U>(self) -> Producer<U, E>
    where
        FilterOptional: Operator<T, E, Value = U, Error = E>,
    {
        self | filter_optional()
    }

    fn distinct_until_changed(self) -> Producer<T, E>
    where
        T: Clone + PartialEq,
    {
        self | distinct_until_changed()
    }

    fn before_next<F>(self, method: F) -> Producer<T, E>
    where
        F: Fn(&T) + 'static,
    {
        self | before_next(method)
    }

    fn after_next<F>(self, method: F) -> Producer<T, E>
    where
        T: Clone,
        F: Fn(&T) + 'static,
    {
        self | after_next(method)
    }

    fn take(self, count: usize) -> Producer<T, E> {
        self | take(count)
    }

    fn skip(self, count: usize) -> Producer<T, E> {
        self | skip(count)
    }

    fn take_while<F>(self, predicate: F) -> Producer<T, E>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self | take_while(predicate)
    }

    fn then(self, following: Producer<T, E>) -> Producer<T, E> {
        self | then(following)
    }

    fn merge_with(self, other: Producer<T, E>) -> Producer<T, E> {
        merge(self, other)
    }

    fn combine_previous(self) -> Producer<(T, T), E>
    where
        T: Clone,
    {
        self | combine_previous()
    }

    fn flatten_latest<U>(self) -> Producer<U, E>
    where
        FlattenLatest: Operator<T, E, Value = U, Error = E>,
    {
        self | flatten_latest()
    }
}
