//! Recording helpers for operator tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use runnel_core::{Consumer, Lifetime, Producer};

/// Everything one subscription observed.
#[derive(Debug, PartialEq)]
pub(crate) struct Recorded<T, E> {
    pub values: Vec<T>,
    pub error: Option<E>,
    pub done: bool,
}

impl<T, E> Default for Recorded<T, E> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            error: None,
            done: false,
        }
    }
}

/// Starts `producer` and records what it pushes. The subscription is kept
/// alive by the returned lifetime.
pub(crate) fn record<T: 'static, E: 'static>(
    producer: Producer<T, E>,
) -> (Rc<RefCell<Recorded<T, E>>>, Lifetime) {
    let log = Rc::new(RefCell::new(Recorded::default()));
    let (n, e, d) = (log.clone(), log.clone(), log.clone());
    let lifetime = producer.start(
        move |value| n.borrow_mut().values.push(value),
        move |error| e.borrow_mut().error = Some(error),
        move || d.borrow_mut().done = true,
    );
    (log, lifetime)
}

/// Starts `producer` and returns the values and completion flag observed
/// synchronously.
pub(crate) fn collect<T: 'static, E: 'static>(producer: Producer<T, E>) -> (Vec<T>, bool) {
    let (log, _lifetime) = record(producer);
    let mut log = log.borrow_mut();
    (core::mem::take(&mut log.values), log.done)
}

/// A producer whose consumers are handed out for manual pushing.
pub(crate) struct Manual<T, E> {
    consumers: Rc<RefCell<Vec<Consumer<T, E>>>>,
    starts: Rc<RefCell<usize>>,
    releases: Rc<RefCell<usize>>,
}

impl<T: Clone + 'static, E: Clone + 'static> Manual<T, E> {
    pub fn new() -> Self {
        Self {
            consumers: Rc::new(RefCell::new(Vec::new())),
            starts: Rc::new(RefCell::new(0)),
            releases: Rc::new(RefCell::new(0)),
        }
    }

    pub fn producer(&self) -> Producer<T, E> {
        let consumers = self.consumers.clone();
        let starts = self.starts.clone();
        let releases = self.releases.clone();
        Producer::new(move |consumer| {
            *starts.borrow_mut() += 1;
            consumers.borrow_mut().push(consumer);
            let releases = releases.clone();
            Lifetime::from_fn(move || *releases.borrow_mut() += 1)
        })
    }

    fn live(&self) -> Vec<Consumer<T, E>> {
        self.consumers.borrow().clone()
    }

    pub fn next(&self, value: T) {
        for consumer in self.live() {
            consumer.put_next(value.clone());
        }
    }

    pub fn error(&self, error: E) {
        for consumer in self.live() {
            consumer.put_error(error.clone());
        }
    }

    pub fn done(&self) {
        for consumer in self.live() {
            consumer.put_done();
        }
    }

    pub fn starts(&self) -> usize {
        *self.starts.borrow()
    }

    pub fn releases(&self) -> usize {
        *self.releases.borrow()
    }
}
