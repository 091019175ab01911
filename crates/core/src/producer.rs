//! Lazy value sequences.
//!
//! A `Producer` does nothing until it is started. Every `start` call runs the
//! generator again with a fresh consumer and returns the lifetime of that one
//! subscription.

use crate::consumer::Consumer;
use crate::lifetime::Lifetime;
use alloc::rc::Rc;
use core::fmt;
use core::ops::BitOr;

/// Error type of producers that never fail.
///
/// The enum has no variants, so `put_error` can never be called with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoError {}

/// Value type of producers that only signal completion.
pub type EmptyValue = ();

type Generator<T, E> = dyn Fn(Consumer<T, E>) -> Lifetime;

/// A lazy, restartable description of a value sequence.
///
/// Cloning is cheap and yields an independent description of the same
/// sequence; each clone can be started separately.
pub struct Producer<T, E = NoError> {
    generator: Rc<Generator<T, E>>,
}

impl<T, E> Clone for Producer<T, E> {
    fn clone(&self) -> Self {
        Self {
            generator: Rc::clone(&self.generator),
        }
    }
}

impl<T, E> fmt::Debug for Producer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

impl<T: 'static, E: 'static> Producer<T, E> {
    /// Creates a producer from a generator.
    ///
    /// The generator receives the consumer of one subscription and returns
    /// whatever must be released when that subscription ends. It may push
    /// synchronously, later, or never.
    pub fn new<G>(generator: G) -> Self
    where
        G: Fn(Consumer<T, E>) -> Lifetime + 'static,
    {
        Self {
            generator: Rc::new(generator),
        }
    }

    /// Starts the producer with an existing consumer.
    ///
    /// The returned lifetime terminates the consumer when destroyed.
    pub fn start_existing(self, consumer: Consumer<T, E>) -> Lifetime {
        let lifetime = (self.generator)(consumer.clone());
        consumer.add_lifetime(lifetime);
        Lifetime::from_fn(move || consumer.terminate())
    }

    /// Starts the producer with three handlers.
    pub fn start<N, R, D>(self, on_next: N, on_error: R, on_done: D) -> Lifetime
    where
        N: Fn(T) + 'static,
        R: Fn(E) + 'static,
        D: Fn() + 'static,
    {
        self.start_existing(Consumer::new(on_next, on_error, on_done))
    }

    /// Starts the producer, handling values only.
    pub fn start_with_next<N>(self, on_next: N) -> Lifetime
    where
        N: Fn(T) + 'static,
    {
        self.start(on_next, |_| {}, || {})
    }

    /// Starts the producer, handling errors only.
    pub fn start_with_error<R>(self, on_error: R) -> Lifetime
    where
        R: Fn(E) + 'static,
    {
        self.start(|_| {}, on_error, || {})
    }

    /// Starts the producer, handling completion only.
    pub fn start_with_done<D>(self, on_done: D) -> Lifetime
    where
        D: Fn() + 'static,
    {
        self.start(|_| {}, |_| {}, on_done)
    }

    /// Starts the producer, handling values and errors.
    pub fn start_with_next_error<N, R>(self, on_next: N, on_error: R) -> Lifetime
    where
        N: Fn(T) + 'static,
        R: Fn(E) + 'static,
    {
        self.start(on_next, on_error, || {})
    }

    /// Starts the producer, handling values and completion.
    pub fn start_with_next_done<N, D>(self, on_next: N, on_done: D) -> Lifetime
    where
        N: Fn(T) + 'static,
        D: Fn() + 'static,
    {
        self.start(on_next, |_| {}, on_done)
    }

    /// Starts the producer, handling errors and completion.
    pub fn start_with_error_done<R, D>(self, on_error: R, on_done: D) -> Lifetime
    where
        R: Fn(E) + 'static,
        D: Fn() + 'static,
    {
        self.start(|_| {}, on_error, on_done)
    }

    /// Starts the producer and ties the subscription to `lifetime`.
    pub fn start_into<N, R, D>(self, on_next: N, on_error: R, on_done: D, lifetime: &mut Lifetime)
    where
        N: Fn(T) + 'static,
        R: Fn(E) + 'static,
        D: Fn() + 'static,
    {
        lifetime.add_lifetime(self.start(on_next, on_error, on_done));
    }

    /// Starts the producer with a value handler tied to `lifetime`.
    pub fn start_with_next_into<N>(self, on_next: N, lifetime: &mut Lifetime)
    where
        N: Fn(T) + 'static,
    {
        lifetime.add_lifetime(self.start_with_next(on_next));
    }

    /// Starts the producer with value and completion handlers tied to
    /// `lifetime`.
    pub fn start_with_next_done_into<N, D>(self, on_next: N, on_done: D, lifetime: &mut Lifetime)
    where
        N: Fn(T) + 'static,
        D: Fn() + 'static,
    {
        lifetime.add_lifetime(self.start_with_next_done(on_next, on_done));
    }

    /// Applies an operator.
    ///
    /// Same as `self | operator`.
    #[inline]
    pub fn pipe<O>(self, operator: O) -> Producer<O::Value, O::Error>
    where
        O: Operator<T, E>,
    {
        operator.apply(self)
    }

    /// Returns a second, independent description of the same sequence.
    #[inline]
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Returns the producer as the uniform `Producer<T, E>` type.
    ///
    /// Producers are stored behind a shared generator already, so this is
    /// an identity conversion.
    #[inline]
    pub fn type_erased(self) -> Self {
        self
    }
}

impl<T: 'static> Producer<T, NoError> {
    /// Re-types a producer that cannot fail so it composes with producers
    /// that can.
    pub fn with_error<E: 'static>(self) -> Producer<T, E> {
        Producer::new(move |consumer: Consumer<T, E>| {
            let (on_next, on_done) = (consumer.clone(), consumer);
            self.clone().start(
                move |value| {
                    on_next.put_next(value);
                },
                |never: NoError| match never {},
                move || on_done.put_done(),
            )
        })
    }
}

/// A transformation from one producer into another.
///
/// Operators are applied with `producer | operator` or
/// [`Producer::pipe`].
pub trait Operator<T, E> {
    /// Value type of the resulting producer.
    type Value;
    /// Error type of the resulting producer.
    type Error;

    /// Builds the resulting producer around `input`.
    fn apply(self, input: Producer<T, E>) -> Producer<Self::Value, Self::Error>;
}

impl<T, E, O> BitOr<O> for Producer<T, E>
where
    O: Operator<T, E>,
{
    type Output = Producer<O::Value, O::Error>;

    #[inline]
    fn bitor(self, operator: O) -> Self::Output {
        operator.apply(self)
    }
}
