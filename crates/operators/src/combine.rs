//! Combining latest values.

use crate::forward::{start_forwarding, start_linked};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use runnel_core::{Consumer, Lifetime, Operator, Producer};

struct PairState<A, B> {
    first: Option<A>,
    second: Option<B>,
}

impl<A: Clone, B: Clone> PairState<A, B> {
    fn latest(&self) -> Option<(A, B)> {
        match (&self.first, &self.second) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        }
    }
}

/// Combines the latest values of two producers.
///
/// Nothing is emitted until both inputs produced a value; after that every
/// value from either side emits the current pair. The result completes when
/// both inputs completed and fails on the first error.
pub fn combine<A, B, E>(first: Producer<A, E>, second: Producer<B, E>) -> Producer<(A, B), E>
where
    A: Clone + 'static,
    B: Clone + 'static,
    E: 'static,
{
    Producer::new(move |consumer: Consumer<(A, B), E>| {
        let state = consumer.make_state(PairState {
            first: None,
            second: None,
        });
        let alive = consumer.make_state(2usize);
        let mut lifetime = Lifetime::new();

        let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
        let (next_state, first_alive) = (state.clone(), alive.clone());
        lifetime.add_lifetime(start_linked(
            first.clone(),
            &consumer,
            move |value| {
                let latest = {
                    let mut state = next_state.borrow_mut();
                    state.first = Some(value);
                    state.latest()
                };
                if let Some(pair) = latest {
                    on_next.put_next(pair);
                }
            },
            move |error| on_error.put_error(error),
            move || finish(&first_alive, &on_done),
        ));
        if consumer.is_terminated() {
            return lifetime;
        }

        let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
        let next_state = state;
        lifetime.add_lifetime(start_linked(
            second.clone(),
            &consumer,
            move |value| {
                let latest = {
                    let mut state = next_state.borrow_mut();
                    state.second = Some(value);
                    state.latest()
                };
                if let Some(pair) = latest {
                    on_next.put_next(pair);
                }
            },
            move |error| on_error.put_error(error),
            move || finish(&alive, &on_done),
        ));
        lifetime
    })
}

/// Counts one input as completed and completes `consumer` after the last.
fn finish<T, E>(alive: &RefCell<usize>, consumer: &Consumer<T, E>) {
    let left = {
        let mut alive = alive.borrow_mut();
        *alive -= 1;
        *alive
    };
    if left == 0 {
        consumer.put_done();
    }
}

struct ListState<T> {
    latest: Vec<Option<T>>,
    missing: usize,
}

/// Combines the latest values of any number of producers into a vector.
///
/// An empty list emits one empty vector and completes.
pub fn combine_all<T, E>(producers: Vec<Producer<T, E>>) -> Producer<Vec<T>, E>
where
    T: Clone + 'static,
    E: 'static,
{
    Producer::new(move |consumer: Consumer<Vec<T>, E>| {
        if producers.is_empty() {
            consumer.put_next(Vec::new());
            consumer.put_done();
            return Lifetime::new();
        }
        let state = consumer.make_state(ListState {
            latest: vec![None; producers.len()],
            missing: producers.len(),
        });
        let alive = consumer.make_state(producers.len());
        let mut lifetime = Lifetime::new();
        for (index, producer) in producers.iter().enumerate() {
            if consumer.is_terminated() {
                break;
            }
            let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
            let (next_state, alive) = (state.clone(), alive.clone());
            lifetime.add_lifetime(start_linked(
                producer.clone(),
                &consumer,
                move |value| {
                    let latest = {
                        let mut state = next_state.borrow_mut();
                        let slot = &mut state.latest[index];
                        let first_value = slot.is_none();
                        *slot = Some(value);
                        if first_value {
                            state.missing -= 1;
                        }
                        if state.missing == 0 {
                            Some(state.latest.iter().flatten().cloned().collect::<Vec<T>>())
                        } else {
                            None
                        }
                    };
                    if let Some(values) = latest {
                        on_next.put_next(values);
                    }
                },
                move |error| on_error.put_error(error),
                move || finish(&alive, &on_done),
            ));
        }
        lifetime
    })
}

/// Operator returned by [`combine_previous`] and [`combine_previous_with`].
pub struct CombinePrevious<T> {
    initial: Option<T>,
}

/// Emits `(previous, current)` pairs, starting with the second value.
pub fn combine_previous<T>() -> CombinePrevious<T> {
    CombinePrevious { initial: None }
}

/// Emits `(previous, current)` pairs, using `initial` as the previous value
/// of the first one.
pub fn combine_previous_with<T>(initial: T) -> CombinePrevious<T> {
    CombinePrevious {
        initial: Some(initial),
    }
}

impl<T, E> Operator<T, E> for CombinePrevious<T>
where
    T: Clone + 'static,
    E: 'static,
{
    type Value = (T, T);
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<(T, T), E> {
        let initial = self.initial;
        Producer::new(move |consumer: Consumer<(T, T), E>| {
            let previous = consumer.make_state(initial.clone());
            start_forwarding(input.clone(), consumer, move |value: T, consumer| {
                let pair = previous
                    .borrow_mut()
                    .replace(value.clone())
                    .map(|previous| (previous, value));
                if let Some(pair) = pair {
                    consumer.put_next(pair);
                }
            })
        })
    }
}
