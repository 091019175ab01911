//! Sequential concatenation.

use crate::forward::{start_forwarding, start_linked};
use runnel_core::{Consumer, Operator, Producer};

/// Operator returned by [`then`].
pub struct Then<T, E> {
    following: Producer<T, E>,
}

/// Forwards the input until it completes, then follows `following`.
///
/// An error from either side terminates the result right away. Both sides
/// share one value and error type; when they differ, map them into a common
/// type (usually an enum) before concatenating.
pub fn then<T, E>(following: Producer<T, E>) -> Then<T, E> {
    Then { following }
}

impl<T, E> Operator<T, E> for Then<T, E>
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        let following = self.following;
        Producer::new(move |consumer: Consumer<T, E>| {
            let following = following.clone();
            let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
            start_linked(
                input.clone(),
                &consumer,
                move |value| {
                    on_next.put_next(value);
                },
                move |error| on_error.put_error(error),
                move || {
                    let lifetime = start_forwarding(
                        following.clone(),
                        on_done.clone(),
                        |value, consumer| {
                            consumer.put_next(value);
                        },
                    );
                    on_done.add_lifetime(lifetime);
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::take::take;
    use crate::test_support::{collect, record, Manual};
    use alloc::vec;
    use runnel_core::{complete, fail, range, single, vector, Lifetime, NoError};

    #[test]
    fn test_then_concatenates() {
        assert_eq!(collect(single(1) | then(single(2))), (vec![1, 2], true));
    }

    #[test]
    fn test_then_chain() {
        let producer = vector(vec![1, 2]) | then(complete()) | then(vector(vec![3]));
        assert_eq!(collect(producer), (vec![1, 2, 3], true));
    }

    #[test]
    fn test_then_endless_sources_stop_after_take() {
        let producer = range(0..) | take(2) | then(range(10..)) | take(4);
        assert_eq!(collect(producer), (vec![0, 1, 10, 11], true));
    }

    #[test]
    fn test_then_error_in_initial_skips_following() {
        let manual = Manual::<i32, &'static str>::new();
        let producer = fail::<i32, &'static str>("first") | then(manual.producer());
        let (log, _lifetime) = record(producer);

        assert_eq!(log.borrow().error, Some("first"));
        assert!(!log.borrow().done);
        assert_eq!(manual.starts(), 0);
    }

    #[test]
    fn test_then_error_in_following() {
        let producer = single(1).with_error::<&'static str>() | then(fail("second"));
        let (log, _lifetime) = record(producer);

        assert_eq!(log.borrow().values, vec![1]);
        assert_eq!(log.borrow().error, Some("second"));
    }

    #[test]
    fn test_then_waits_for_initial() {
        let first = Manual::<i32, ()>::new();
        let second = Manual::<i32, ()>::new();
        let (log, lifetime) = record(first.producer() | then(second.producer()));

        first.next(1);
        assert_eq!(second.starts(), 0);
        first.done();
        assert_eq!(second.starts(), 1);
        assert!(!log.borrow().done);

        second.next(2);
        second.done();
        assert_eq!(log.borrow().values, vec![1, 2]);
        assert!(log.borrow().done);
        drop(lifetime);
    }

    #[test]
    fn test_then_cancel_releases_following() {
        let first = Manual::<i32, NoError>::new();
        let second = Manual::<i32, NoError>::new();
        let mut lifetime = Lifetime::new();
        (first.producer() | then(second.producer())).start_with_next_into(|_| {}, &mut lifetime);

        first.done();
        assert_eq!(second.starts(), 1);
        assert_eq!(second.releases(), 0);

        lifetime.destroy();
        assert_eq!(second.releases(), 1);
    }
}
