//! Switching to the latest inner producer.

use crate::forward::start_linked;
use crate::map::map;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::mem;
use runnel_core::{Consumer, Lifetime, Operator, Producer};

struct FlattenState {
    outer_done: bool,
    inner_done: bool,
    /// Bumped for every inner producer; handlers of older ones go quiet.
    generation: u64,
    /// Subscription to the current inner producer.
    inner: Lifetime,
}

/// Operator returned by [`flatten_latest`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FlattenLatest;

/// Flattens a producer of producers by following the most recent one.
///
/// Each new inner producer ends the subscription to the previous inner
/// producer before it is started. The result completes only once the outer
/// producer and the current inner producer have both completed. An error
/// from either level terminates the result.
pub fn flatten_latest() -> FlattenLatest {
    FlattenLatest
}

impl<T, E> Operator<Producer<T, E>, E> for FlattenLatest
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<Producer<T, E>, E>) -> Producer<T, E> {
        Producer::new(move |consumer: Consumer<T, E>| {
            let state = consumer.make_state(FlattenState {
                outer_done: false,
                inner_done: true,
                generation: 0,
                inner: Lifetime::new(),
            });

            // The state owns the inner subscription, whose handlers hold the
            // consumer, so the inner lifetime has to be ended explicitly.
            let release_state = state.clone();
            consumer.add_release(move || {
                let mut inner = mem::take(&mut release_state.borrow_mut().inner);
                inner.destroy();
            });

            let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
            let next_state = state.clone();
            let done_state = state;
            start_linked(
                input.clone(),
                &consumer,
                move |inner: Producer<T, E>| {
                    if on_next.is_terminated() {
                        return;
                    }
                    let generation = {
                        let mut state = next_state.borrow_mut();
                        state.generation += 1;
                        state.inner_done = false;
                        state.generation
                    };
                    let subscriber = inner_consumer(&next_state, generation, &on_next);
                    let mut previous =
                        mem::replace(&mut next_state.borrow_mut().inner, subscriber.terminator());
                    previous.destroy();

                    // The inner producer may switch the outer one while it
                    // starts; only the newest subscription is kept.
                    let lifetime = inner.start_existing(subscriber);
                    let mut state = next_state.borrow_mut();
                    if state.generation == generation {
                        state.inner.add_lifetime(lifetime);
                    } else {
                        drop(state);
                        drop(lifetime);
                    }
                },
                move |error| on_error.put_error(error),
                move || {
                    let finished = {
                        let mut state = done_state.borrow_mut();
                        state.outer_done = true;
                        state.inner_done
                    };
                    if finished {
                        on_done.put_done();
                    }
                },
            )
        })
    }
}

fn is_current(state: &Weak<RefCell<FlattenState>>, generation: u64) -> bool {
    state
        .upgrade()
        .map_or(false, |state| state.borrow().generation == generation)
}

/// Builds the consumer of inner producer number `generation`.
///
/// Its handlers forward to `downstream` until a newer inner producer
/// arrives.
fn inner_consumer<T, E>(
    state: &Rc<RefCell<FlattenState>>,
    generation: u64,
    downstream: &Consumer<T, E>,
) -> Consumer<T, E>
where
    T: 'static,
    E: 'static,
{
    let (next_state, on_next) = (Rc::downgrade(state), downstream.clone());
    let (error_state, on_error) = (Rc::downgrade(state), downstream.clone());
    let (done_state, on_done) = (Rc::downgrade(state), downstream.clone());
    Consumer::new(
        move |value| {
            if is_current(&next_state, generation) {
                on_next.put_next(value);
            }
        },
        move |error| {
            if is_current(&error_state, generation) {
                on_error.put_error(error);
            }
        },
        move || {
            let finished = match done_state.upgrade() {
                Some(state) => {
                    let mut state = state.borrow_mut();
                    if state.generation != generation {
                        return;
                    }
                    state.inner_done = true;
                    state.outer_done
                }
                None => return,
            };
            if finished {
                on_done.put_done();
            }
        },
    )
}

/// Follows `then` while the latest `condition` is true and `otherwise`
/// while it is false.
pub fn conditional<T, E>(
    condition: Producer<bool, E>,
    then: Producer<T, E>,
    otherwise: Producer<T, E>,
) -> Producer<T, E>
where
    T: 'static,
    E: 'static,
{
    condition
        | map(move |value: bool| if value { then.clone() } else { otherwise.clone() })
        | flatten_latest()
}
