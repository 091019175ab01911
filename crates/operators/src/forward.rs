//! Shared plumbing for starting upstream producers.

use runnel_core::{Consumer, Lifetime, Producer};

/// Starts `input` on behalf of `downstream`.
///
/// The upstream consumer's terminator is tied to `downstream` before the
/// generator runs, so a downstream terminal signal pushed from inside a
/// synchronous source ends that source right away. Nothing is started when
/// `downstream` is already terminated.
pub(crate) fn start_linked<T, E, U, F, N, R, D>(
    input: Producer<T, E>,
    downstream: &Consumer<U, F>,
    on_next: N,
    on_error: R,
    on_done: D,
) -> Lifetime
where
    T: 'static,
    E: 'static,
    N: Fn(T) + 'static,
    R: Fn(E) + 'static,
    D: Fn() + 'static,
{
    let upstream = Consumer::new(on_next, on_error, on_done);
    if !downstream.add_lifetime(upstream.terminator()) {
        return Lifetime::new();
    }
    input.start_existing(upstream)
}

/// Starts `input` so that errors and completion go straight to `consumer`
/// and every value is handed to `on_value` together with `consumer`.
pub(crate) fn start_forwarding<T, U, E, N>(
    input: Producer<T, E>,
    consumer: Consumer<U, E>,
    on_value: N,
) -> Lifetime
where
    T: 'static,
    U: 'static,
    E: 'static,
    N: Fn(T, &Consumer<U, E>) + 'static,
{
    let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
    start_linked(
        input,
        &consumer,
        move |value| on_value(value, &on_next),
        move |error| on_error.put_error(error),
        move || on_done.put_done(),
    )
}
