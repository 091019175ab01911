//! Interleaving several producers.

use crate::forward::start_linked;
use alloc::vec;
use alloc::vec::Vec;
use runnel_core::{Consumer, Lifetime, Operator, Producer};

/// Merges two producers.
///
/// Values are forwarded as they arrive. The result completes once both
/// inputs completed and fails on the first error.
pub fn merge<T, E>(first: Producer<T, E>, second: Producer<T, E>) -> Producer<T, E>
where
    T: 'static,
    E: 'static,
{
    merge_all(vec![first, second])
}

/// Merges any number of producers. An empty list completes immediately.
pub fn merge_all<T, E>(producers: Vec<Producer<T, E>>) -> Producer<T, E>
where
    T: 'static,
    E: 'static,
{
    Producer::new(move |consumer: Consumer<T, E>| {
        if producers.is_empty() {
            consumer.put_done();
            return Lifetime::new();
        }
        let alive = consumer.make_state(producers.len());
        let mut lifetime = Lifetime::new();
        for producer in &producers {
            if consumer.is_terminated() {
                break;
            }
            let (on_next, on_error, on_done) = (consumer.clone(), consumer.clone(), consumer.clone());
            let alive = alive.clone();
            lifetime.add_lifetime(start_linked(
                producer.clone(),
                &consumer,
                move |value| {
                    on_next.put_next(value);
                },
                move |error| on_error.put_error(error),
                move || {
                    let left = {
                        let mut alive = alive.borrow_mut();
                        *alive -= 1;
                        *alive
                    };
                    if left == 0 {
                        on_done.put_done();
                    }
                },
            ));
        }
        lifetime
    })
}

/// Operator returned by [`merge_with`].
pub struct MergeWith<T, E> {
    other: Producer<T, E>,
}

/// Pipeline form of [`merge`].
pub fn merge_with<T, E>(other: Producer<T, E>) -> MergeWith<T, E> {
    MergeWith { other }
}

impl<T, E> Operator<T, E> for MergeWith<T, E>
where
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn apply(self, input: Producer<T, E>) -> Producer<T, E> {
        merge(input, self.other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{collect, record, Manual};
    use runnel_core::{fail, never, vector};

    #[test]
    fn test_merge_sync_sources() {
        let producer = merge(vector(vec![1, 2]), vector(vec![3]));
        assert_eq!(collect(producer), (vec![1, 2, 3], true));
    }

    #[test]
    fn test_merge_interleaves() {
        let a = Manual::<i32, ()>::new();
        let b = Manual::<i32, ()>::new();
        let (log, _lifetime) = record(a.producer() | merge_with(b.producer()));

        a.next(1);
        b.next(10);
        a.next(2);
        a.done();
        assert!(!log.borrow().done);
        b.next(20);
        b.done();

        assert_eq!(log.borrow().values, vec![1, 10, 2, 20]);
        assert!(log.borrow().done);
    }

    #[test]
    fn test_merge_waits_for_all() {
        assert_eq!(collect(merge(vector(vec![1]), never())), (vec![1], false));
    }

    #[test]
    fn test_merge_empty() {
        assert_eq!(collect(merge_all::<i32, ()>(Vec::new())), (vec![], true));
    }

    #[test]
    fn test_merge_error_stops_everything() {
        let other = Manual::<i32, &'static str>::new();
        let producer = merge_all(vec![fail("bad"), other.producer()]);
        let (log, _lifetime) = record(producer);

        assert_eq!(log.borrow().error, Some("bad"));
        assert_eq!(other.starts(), 0);
    }

    #[test]
    fn test_merge_cancel_releases_inputs() {
        let a = Manual::<i32, ()>::new();
        let b = Manual::<i32, ()>::new();
        let (_log, lifetime) = record(merge(a.producer(), b.producer()));
        assert_eq!((a.releases(), b.releases()), (0, 0));

        drop(lifetime);
        assert_eq!((a.releases(), b.releases()), (1, 1));
    }
}
