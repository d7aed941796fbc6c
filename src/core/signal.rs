//! A `Signal` broadcasts a value to every subscriber that registered on it.
//!
//! Minicolumns use a `Signal<f32>` to announce a change of their active state ("spike"), and layers
//! and sensors use a `Signal<[f32]>` to republish whole output vectors. The publisher owns its
//! subscriber list, so a source never needs to know who consumes it.
//!
//! Fan-out is synchronous and follows subscription order. A subscriber may fire other signals while
//! it runs; any chain of subscriptions completes before `fire` returns. Keep chains acyclic within a
//! tick, otherwise the recursion has no bound.

use super::error::Result;
use log::warn;
use std::cell::RefCell;
use std::fmt;

/// Receives values published on a `Signal`.
pub trait Subscriber<T: ?Sized> {
    fn receive(&self, value: &T) -> Result<()>;
}

impl<T, F> Subscriber<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> Result<()>,
{
    #[inline]
    fn receive(&self, value: &T) -> Result<()> {
        self(value)
    }
}

/// One-to-many publisher of values of type `T`.
pub struct Signal<T: ?Sized> {
    subscribers: RefCell<Vec<Box<dyn Subscriber<T>>>>,
}

impl<T: ?Sized> Signal<T> {
    /// Creates a signal without subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Appends a subscriber. It is called after all earlier subscribers on every `fire`.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a `fire` of this same signal.
    pub fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<T> + 'static,
    {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    /// The number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Delivers `value` to every subscriber in subscription order.
    ///
    /// All subscribers run even if one of them fails; the first error is returned afterwards.
    pub fn fire(&self, value: &T) -> Result<()> {
        let subscribers = self.subscribers.borrow();
        let mut first_error = None;

        for (index, subscriber) in subscribers.iter().enumerate() {
            if let Err(err) = subscriber.receive(value) {
                warn!("subscriber {} rejected a signal: {}", index, err);
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
