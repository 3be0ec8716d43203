//! Cart Observers

use std::fmt;

use slotmap::{SlotMap, new_key_type};

use crate::cart::CartSnapshot;

new_key_type! {
    /// Handle returned by [`Cart::subscribe`](crate::cart::Cart::subscribe).
    pub struct SubscriptionKey;
}

/// Observer trait for reacting to cart changes.
///
/// Observers are called synchronously, once per state-changing operation,
/// after the change has been fully applied. The snapshot they receive is the
/// post-mutation state, so reading it is equivalent to calling
/// [`Cart::snapshot`](crate::cart::Cart::snapshot) right after the call
/// returns.
///
/// Any `FnMut(&CartSnapshot)` closure is an observer.
pub trait CartObserver {
    /// Called after every change to the cart.
    fn on_change(&mut self, snapshot: &CartSnapshot);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartSnapshot),
{
    fn on_change(&mut self, snapshot: &CartSnapshot) {
        self(snapshot);
    }
}

/// Registry of subscribed observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    observers: SlotMap<SubscriptionKey, Box<dyn CartObserver>>,
    order: Vec<SubscriptionKey>,
}

impl Observers {
    pub(crate) fn insert(&mut self, observer: Box<dyn CartObserver>) -> SubscriptionKey {
        let key = self.observers.insert(observer);
        self.order.push(key);

        key
    }

    pub(crate) fn remove(&mut self, key: SubscriptionKey) -> bool {
        if self.observers.remove(key).is_none() {
            return false;
        }

        self.order.retain(|subscribed| *subscribed != key);

        true
    }

    pub(crate) fn notify(&mut self, snapshot: &CartSnapshot) {
        for key in &self.order {
            if let Some(observer) = self.observers.get_mut(*key) {
                observer.on_change(snapshot);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.observers.len())
            .finish()
    }
}
